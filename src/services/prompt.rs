//! 题目提取提示词

/// 附带在图片前面发送给模型的固定提示词
///
/// 要求模型只输出符合 `Question` 结构的原始 JSON 数组
pub const EXTRACTION_PROMPT: &str = r#"You are given a photo or scan of an exam page. Extract every multiple-choice question on it.

Return ONLY a raw JSON array, with no markdown, no code fences and no commentary. Each element must have exactly this shape:

{
  "questionText": "the full question stem",
  "isExtraImageExist": "Yes if the question depends on a figure, diagram or picture, otherwise an empty string",
  "referenceText": "any passage or reference material the question relies on, otherwise an empty string",
  "solutionText": "a short explanation of the correct answer, otherwise an empty string",
  "options": [
    { "text": "option text without the leading letter", "isCorrect": true }
  ]
}

Rules:
1. Keep the questions in the order they appear on the page.
2. Mark exactly one option per question with "isCorrect": true, and all others false.
3. Preserve the original language and mathematical notation of the page.
4. If no questions are found, return [].
"#;

/// 提示词中 `isExtraImageExist` 的哨兵值
pub const EXTRA_IMAGE_SENTINEL: &str = "Yes";
