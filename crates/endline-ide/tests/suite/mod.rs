mod cancellation;
mod line_ender;
mod registry;
