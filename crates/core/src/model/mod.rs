mod achievement;
mod progress;
mod user;

pub use achievement::{Achievement, AchievementInput};
pub use progress::{
    ErrorDetail, ErrorDetailsError, LOCAL_ID_PREFIX, Progress, ProgressPatch, local_record_id,
    parse_error_details, serialize_error_details,
};
pub use user::{CompletionAttempt, User, UserPatch};
