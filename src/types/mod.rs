// src/types/mod.rs
pub mod application;
pub mod category;
pub mod job;
pub mod profile;
pub mod response;

pub use application::{ApplicationDraft, ApplicationStatus, JobApplication};
pub use category::Category;
pub use job::{Job, JobType};
pub use profile::{JobSeekerProfile, ProfileForm};
