use serde::{Deserialize, Serialize};

use super::question::Question;

/// 中转后端 `/generate` 的响应
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RelayResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub questions: Vec<Question>,
}
