/// How a listing that returned several records is narrowed to one.
///
/// The authority does not guarantee unique names, so the first record is
/// always taken. Profile lookups warn about it; bundle ID lookups do not.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DuplicatePolicy {
    WarnAndTakeFirst,
    TakeFirst,
}

pub const PROFILE_LISTING: DuplicatePolicy = DuplicatePolicy::WarnAndTakeFirst;
pub const BUNDLE_ID_LISTING: DuplicatePolicy = DuplicatePolicy::TakeFirst;

impl DuplicatePolicy {
    pub fn warns_on(&self, count: usize) -> bool {
        count > 1 && *self == DuplicatePolicy::WarnAndTakeFirst
    }
}

pub fn first_match<R>(kind: &str, records: Vec<R>, policy: DuplicatePolicy) -> Option<R> {
    if policy.warns_on(records.len()) {
        log::warn!(
            "More than one matching {} found ({}), using the first one",
            kind,
            records.len()
        );
    }

    records.into_iter().next()
}
