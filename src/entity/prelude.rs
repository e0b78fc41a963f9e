pub use super::assignment_files::Entity as AssignmentFiles;
pub use super::assignments::Entity as Assignments;
pub use super::submissions::Entity as Submissions;
