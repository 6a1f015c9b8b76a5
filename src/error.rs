use thiserror::Error;

/// Failure modes surfaced by the component tree, motor parser, and integrator.
///
/// Setters that receive bad geometry do not return this type: they clamp and
/// log instead (see the module docs on `component`). `SimError` is reserved
/// for outcomes that actually abort construction or a run.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SimError {
    #[error("cannot add a {child} as a child of a {parent}")]
    ComponentTypeMismatch {
        parent: &'static str,
        child: &'static str,
    },

    #[error("motor file parse error: {reason}")]
    MotorParseError { reason: String },

    #[error("integration did not land within {steps} steps")]
    NumericalDivergence { steps: u64 },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_messages_are_non_empty_and_field_bearing() {
        let e = SimError::ComponentTypeMismatch {
            parent: "BodyTube",
            child: "Stage",
        };
        assert!(e.to_string().contains("BodyTube"));
        assert!(e.to_string().contains("Stage"));

        let e = SimError::MotorParseError {
            reason: "bad header".into(),
        };
        assert!(e.to_string().contains("bad header"));

        let e = SimError::NumericalDivergence { steps: 1_000_000 };
        assert!(e.to_string().contains("1000000"));
    }
}
