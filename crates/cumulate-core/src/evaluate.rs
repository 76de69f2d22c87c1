use crate::model::{CumulatedFrom, Status};

/// Cross-level consistency verdict for one row: every level that reused a
/// prior page must point at the same prior occurrence. Rows where at most
/// one level reused anything are trivially consistent.
pub fn row_status(cumulated: &[CumulatedFrom; 4]) -> Status {
    let mut distinct: Vec<&str> = Vec::new();
    for value in cumulated {
        if let CumulatedFrom::Reused(reference) = value {
            if !distinct.contains(&reference.as_str()) {
                distinct.push(reference);
            }
        }
    }
    if distinct.len() <= 1 {
        Status::Pass
    } else {
        Status::Fail
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn fresh() -> CumulatedFrom {
        CumulatedFrom::Fresh
    }

    fn reused(s: &str) -> CumulatedFrom {
        CumulatedFrom::Reused(s.to_string())
    }

    #[test]
    fn all_fresh_is_pass() {
        assert_eq!(row_status(&[fresh(), fresh(), fresh(), fresh()]), Status::Pass);
    }

    #[test]
    fn single_reusing_level_is_pass() {
        assert_eq!(
            row_status(&[fresh(), reused("Step 2"), fresh(), fresh()]),
            Status::Pass
        );
    }

    #[test]
    fn agreeing_reuses_are_pass() {
        assert_eq!(
            row_status(&[reused("1 - Step 2"), reused("1 - Step 2"), fresh(), fresh()]),
            Status::Pass
        );
    }

    #[test]
    fn disagreeing_reuses_are_fail() {
        assert_eq!(
            row_status(&[reused("1 - Step 2"), reused("3 - Step 1"), fresh(), fresh()]),
            Status::Fail
        );
    }
}
