pub mod form_state;
pub mod submit_flow;

pub use form_state::{FormPhase, FormState};
pub use submit_flow::{SubmitFlow, SubmitOutcome, SUBMIT_LABEL_BUSY, SUBMIT_LABEL_IDLE};
