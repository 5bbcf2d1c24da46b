// Application layer - Use case interactors

pub mod container;
pub mod submit_interactor;

// Re-export interactors
pub use container::{AppContainer, DefaultAppContainer};
pub use submit_interactor::{JobDraft, SubmitInteractor};
