//! Result Presenter
//!
//! Pure mapping from a server outcome to what the user sees and where the
//! screen goes next. Effects are applied by the registration flow.

use crate::messages::Notice;
use radar_core::types::SubmissionOutcome;

/// Where the screen goes after a result is shown.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FollowUpAction {
    /// Return to the home page
    NavigateHome,
    /// Stay on the registration page
    Stay,
}

/// User-facing treatment of one outcome.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Presentation {
    /// Alert to show, if any
    pub notice: Option<Notice>,
    /// Follow-up navigation
    pub action: FollowUpAction,
}

/// Decide how to present `outcome`.
///
/// | outcome           | notice                | action        |
/// |-------------------|-----------------------|---------------|
/// | accepted          | `Submitted`           | navigate home |
/// | rejected (406)    | `IdentifierIncorrect` | stay          |
/// | server error      | `CannotConnect`       | stay          |
/// | malformed (400)   | `RecordDataProblem`   | stay          |
/// | unknown           | none (logged)         | stay          |
pub fn present(outcome: SubmissionOutcome) -> Presentation {
    let (notice, action) = match outcome {
        SubmissionOutcome::Accepted => (Some(Notice::Submitted), FollowUpAction::NavigateHome),
        SubmissionOutcome::Rejected => (Some(Notice::IdentifierIncorrect), FollowUpAction::Stay),
        SubmissionOutcome::ServerError => (Some(Notice::CannotConnect), FollowUpAction::Stay),
        SubmissionOutcome::MalformedRequest => {
            (Some(Notice::RecordDataProblem), FollowUpAction::Stay)
        }
        SubmissionOutcome::Unknown(_) => (None, FollowUpAction::Stay),
    };
    Presentation { notice, action }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepted_goes_home() {
        let p = present(SubmissionOutcome::Accepted);
        assert_eq!(p.notice, Some(Notice::Submitted));
        assert_eq!(p.action, FollowUpAction::NavigateHome);
    }

    #[test]
    fn test_failures_stay() {
        for (outcome, notice) in [
            (SubmissionOutcome::Rejected, Notice::IdentifierIncorrect),
            (SubmissionOutcome::ServerError, Notice::CannotConnect),
            (SubmissionOutcome::MalformedRequest, Notice::RecordDataProblem),
        ] {
            let p = present(outcome);
            assert_eq!(p.notice, Some(notice));
            assert_eq!(p.action, FollowUpAction::Stay);
        }
    }

    #[test]
    fn test_unknown_is_silent() {
        let p = present(SubmissionOutcome::Unknown(302));
        assert_eq!(p.notice, None);
        assert_eq!(p.action, FollowUpAction::Stay);
    }
}
