use time::{Date, Duration, Month, OffsetDateTime};

use crate::classify;
use crate::dates;
use crate::fields::Certificate;
use crate::lint::{Lint, LintDefinition, LintSource};
use crate::status::LintResult;

const MAX_VALIDITY_MONTHS: i32 = 39;

struct SubCertValidTimeLongerThan39Months;

impl Lint for SubCertValidTimeLongerThan39Months {
    fn check_applies(&self, cert: &Certificate) -> bool {
        classify::is_subscriber(cert)
    }

    fn execute(&self, cert: &Certificate) -> LintResult {
        let not_before = cert.not_before.instant();
        let not_after = cert.not_after.instant();
        match add_months(not_before, MAX_VALIDITY_MONTHS) {
            None => LintResult::fatal("validity period is out of range"),
            Some(limit) if limit < not_after => LintResult::error(format!(
                "validity ends {}, after the 39 month limit",
                cert.not_after
            )),
            Some(_) => LintResult::pass(),
        }
    }
}

/// Add calendar months, letting a day that does not exist in the target
/// month roll over into the next one (Jan 31 + 1 month is Mar 3 or Mar 2).
fn add_months(at: OffsetDateTime, months: i32) -> Option<OffsetDateTime> {
    let total = at.year() * 12 + i32::from(u8::from(at.month())) - 1 + months;
    let month = Month::try_from(u8::try_from(total.rem_euclid(12) + 1).ok()?).ok()?;
    let first = Date::from_calendar_date(total.div_euclid(12), month, 1).ok()?;
    let date = first.checked_add(Duration::days(i64::from(at.day()) - 1))?;
    Some(at.replace_date(date))
}

pub(super) fn definition() -> LintDefinition {
    LintDefinition {
        name: "e_sub_cert_valid_time_longer_than_39_months",
        description: "Subscriber Certificates issued after 1 July 2016 but prior to 1 March 2018 MUST have a Validity Period no greater than 39 months.",
        citation: "MRfCSC: 6.3.2",
        source: LintSource::MinimumRequirementsCodeSigning,
        effective_date: dates::SUB_CERT_39_MONTH,
        lint: Box::new(SubCertValidTimeLongerThan39Months),
    }
}
