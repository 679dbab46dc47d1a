use crate::value::Value;

/// Hook for seeding the evaluation environment before a session starts.
///
/// A driver contributes bindings (and may hold external resources that
/// `teardown` releases); the session engine announces it in the banner.
pub trait EnvDriver {
    fn name(&self) -> &str;

    /// One-line description shown in the session banner.
    fn banner(&self) -> String;

    /// Bindings to install before the first chunk runs.
    fn setup(&mut self) -> Vec<(String, Value)>;

    fn teardown(&mut self) {}
}

/// Seeds the common math constants.
#[derive(Debug, Default)]
pub struct MathDriver;

impl EnvDriver for MathDriver {
    fn name(&self) -> &str {
        "math"
    }

    fn banner(&self) -> String {
        "math constants preloaded: pi, e, tau".to_string()
    }

    fn setup(&mut self) -> Vec<(String, Value)> {
        vec![
            ("pi".to_string(), Value::Number(std::f64::consts::PI)),
            ("e".to_string(), Value::Number(std::f64::consts::E)),
            ("tau".to_string(), Value::Number(std::f64::consts::TAU)),
        ]
    }
}
