//! # Write Authorization
//!
//! - Members of `sd-admin` may write any section of any entry.
//! - Everyone else may write only the `channels` and `preferences` sections
//!   of the entry named after their own certificate.

use shared_crypto::SubjectInfo;
use shared_types::{ChangeRecord, ADMIN_GROUP, SECTION_CHANNELS, SECTION_PREFERENCES};

/// Sections an operator may write in its own entry.
pub const OWNER_SECTIONS: [&str; 2] = [SECTION_CHANNELS, SECTION_PREFERENCES];

pub fn is_admin(subject: &SubjectInfo) -> bool {
    subject.in_group(ADMIN_GROUP)
}

/// Whether `subject` may sign `record`.
pub fn may_write(subject: &SubjectInfo, record: &ChangeRecord) -> bool {
    if is_admin(subject) {
        return true;
    }
    !subject.name.is_empty()
        && subject.name == record.name
        && OWNER_SECTIONS.contains(&record.section.as_str())
}
