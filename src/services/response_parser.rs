//! 模型响应解析 - 业务能力层
//!
//! 从 Gemini 响应中取出文本，去掉 markdown 代码围栏，再解析成题目列表

use std::sync::LazyLock;

use regex::Regex;
use tracing::{debug, warn};

use crate::error::SubmitError;
use crate::models::{GeminiResponse, Question};

static LEADING_FENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^```(?:json|JSON)?[ \t]*").expect("合法的正则"));
static TRAILING_FENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"```$").expect("合法的正则"));

/// 取第一个候选的第一个文本片段
///
/// 没有候选、没有内容或第一个片段不是文本时返回 `NoCandidate`
pub fn first_candidate_text(response: &GeminiResponse) -> Result<&str, SubmitError> {
    response
        .candidates
        .first()
        .and_then(|c| c.content.as_ref())
        .and_then(|content| content.parts.first())
        .and_then(|part| part.as_text())
        .ok_or(SubmitError::NoCandidate)
}

/// 去掉首尾的 ```` ```json ```` / ```` ``` ```` 围栏
///
/// 反复剥离直到不再变化，因此结果是幂等的
pub fn strip_code_fences(text: &str) -> String {
    let mut current = text.trim().to_string();
    loop {
        let without_leading = LEADING_FENCE.replace(&current, "");
        let stripped = TRAILING_FENCE.replace(without_leading.trim_end(), "");
        let next = stripped.trim().to_string();
        if next == current {
            return current;
        }
        current = next;
    }
}

/// 解析模型输出为题目列表
///
/// 失败时不返回任何部分结果
pub fn parse_questions(text: &str) -> Result<Vec<Question>, SubmitError> {
    let cleaned = strip_code_fences(text);
    debug!("清理后的模型输出长度: {} 字符", cleaned.len());

    serde_json::from_str::<Vec<Question>>(&cleaned).map_err(|e| {
        warn!("模型输出不是合法的题目 JSON: {}", e);
        SubmitError::malformed_json(e, &cleaned)
    })
}

/// 从完整响应中解析题目列表
pub fn questions_from_response(response: &GeminiResponse) -> Result<Vec<Question>, SubmitError> {
    let text = first_candidate_text(response).inspect_err(|_| warn!("模型响应中没有候选文本"))?;
    parse_questions(text)
}
