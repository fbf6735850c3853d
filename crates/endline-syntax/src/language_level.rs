//! Java language level + preview feature availability model.
//!
//! The parser always accepts a superset grammar; the language level only decides which
//! constructs are reported by the feature-gate pass.

use serde::{Deserialize, Serialize};

/// The effective Java language mode for a document.
///
/// - `major`: the Java feature release number (7, 8, 11, 17, 21, …)
/// - `preview`: whether `--enable-preview` is in effect for this major version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct JavaLanguageLevel {
    pub major: u16,
    #[serde(default)]
    pub preview: bool,
}

impl JavaLanguageLevel {
    pub const JAVA_7: Self = Self {
        major: 7,
        preview: false,
    };
    pub const JAVA_8: Self = Self {
        major: 8,
        preview: false,
    };
    pub const JAVA_11: Self = Self {
        major: 11,
        preview: false,
    };
    pub const JAVA_17: Self = Self {
        major: 17,
        preview: false,
    };
    pub const JAVA_21: Self = Self {
        major: 21,
        preview: false,
    };

    #[inline]
    pub const fn with_preview(self, preview: bool) -> Self {
        Self { preview, ..self }
    }

    pub fn availability(self, feature: JavaFeature) -> FeatureAvailability {
        use FeatureAvailability::*;
        use JavaFeature::*;

        match feature {
            LambdaExpressions | MethodReferences => {
                if self.major >= 8 {
                    Stable
                } else {
                    Unavailable
                }
            }

            VarLocalInference => {
                if self.major >= 10 {
                    Stable
                } else {
                    Unavailable
                }
            }

            SwitchExpressions => {
                if self.major >= 14 {
                    Stable
                } else if self.major == 12 || self.major == 13 {
                    Preview
                } else {
                    Unavailable
                }
            }
        }
    }

    /// Is the feature usable in this configuration? (applies `preview` flag)
    pub fn is_enabled(self, feature: JavaFeature) -> bool {
        match self.availability(feature) {
            FeatureAvailability::Stable => true,
            FeatureAvailability::Preview => self.preview,
            FeatureAvailability::Unavailable => false,
        }
    }

    #[inline]
    pub fn supports_lambdas(self) -> bool {
        self.is_enabled(JavaFeature::LambdaExpressions)
    }

    #[inline]
    pub fn supports_var_local_inference(self) -> bool {
        self.is_enabled(JavaFeature::VarLocalInference)
    }
}

impl Default for JavaLanguageLevel {
    fn default() -> Self {
        JavaLanguageLevel::JAVA_21
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JavaFeature {
    LambdaExpressions, // Java 8+
    MethodReferences,  // Java 8+
    VarLocalInference, // Java 10+
    SwitchExpressions, // final Java 14 (preview 12/13)
}

impl JavaFeature {
    pub const fn diagnostic_code(self) -> &'static str {
        match self {
            JavaFeature::LambdaExpressions => "JAVA_FEATURE_LAMBDA_EXPRESSIONS",
            JavaFeature::MethodReferences => "JAVA_FEATURE_METHOD_REFERENCES",
            JavaFeature::VarLocalInference => "JAVA_FEATURE_VAR_LOCAL_INFERENCE",
            JavaFeature::SwitchExpressions => "JAVA_FEATURE_SWITCH_EXPRESSIONS",
        }
    }

    pub const fn display_name(self) -> &'static str {
        match self {
            JavaFeature::LambdaExpressions => "lambda expressions",
            JavaFeature::MethodReferences => "method references",
            JavaFeature::VarLocalInference => "local variable type inference (`var`)",
            JavaFeature::SwitchExpressions => "switch expressions",
        }
    }

    pub const fn stable_since(self) -> u16 {
        match self {
            JavaFeature::LambdaExpressions | JavaFeature::MethodReferences => 8,
            JavaFeature::VarLocalInference => 10,
            JavaFeature::SwitchExpressions => 14,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FeatureAvailability {
    Stable,
    Preview,
    Unavailable,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn switch_expressions_need_preview_flag_on_13() {
        let level = JavaLanguageLevel {
            major: 13,
            preview: false,
        };
        assert_eq!(
            level.availability(JavaFeature::SwitchExpressions),
            FeatureAvailability::Preview
        );
        assert!(!level.is_enabled(JavaFeature::SwitchExpressions));
        assert!(level
            .with_preview(true)
            .is_enabled(JavaFeature::SwitchExpressions));
    }

    #[test]
    fn java_7_has_no_lambdas() {
        assert!(!JavaLanguageLevel::JAVA_7.supports_lambdas());
        assert!(JavaLanguageLevel::JAVA_8.supports_lambdas());
        assert!(!JavaLanguageLevel::JAVA_8.supports_var_local_inference());
        assert!(JavaLanguageLevel::default().supports_var_local_inference());
    }

    #[test]
    fn deserializes_without_preview() {
        let level: JavaLanguageLevel = serde_json::from_str(r#"{ "major": 11 }"#).unwrap();
        assert_eq!(level, JavaLanguageLevel::JAVA_11);
    }
}
