//! 终端渲染：标题、题目列表、错误提示

use std::fmt::Write as _;

use crate::error::SubmitError;
use crate::models::Question;

// ---------------------------------------------------------------------------
// ANSI 样式
// ---------------------------------------------------------------------------

pub const RESET: &str = "\x1b[0m";
pub const BOLD: &str = "\x1b[1m";
pub const DIM: &str = "\x1b[2m";
pub const GREEN: &str = "\x1b[32m";
pub const YELLOW: &str = "\x1b[33m";

pub const TITLE: &str = "The Brain of Ayotto";
pub const TAGLINE: &str = "The uniqueness of Ayotto AI that can reduce time, effort & cost";
pub const RESULTS_HEADING: &str = "Extracted Questions:";
pub const EMPTY_PLACEHOLDER: &str = "No questions extracted yet.";

/// 渲染选项
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderOptions {
    pub color: bool,
    /// 列表为空时是否显示占位提示
    pub show_placeholder: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            color: false,
            show_placeholder: true,
        }
    }
}

/// 终端是否支持彩色输出
pub fn supports_color() -> bool {
    std::env::var("NO_COLOR")
        .map(|v| v.is_empty())
        .unwrap_or(true)
        && std::env::var("TERM")
            .map(|t| t != "dumb")
            .unwrap_or(false)
}

fn paint(text: &str, style: &str, opts: &RenderOptions) -> String {
    if opts.color {
        format!("{style}{text}{RESET}")
    } else {
        text.to_string()
    }
}

pub fn render_header(opts: &RenderOptions) -> String {
    format!(
        "{}\n{}\n",
        paint(TITLE, BOLD, opts),
        paint(TAGLINE, DIM, opts)
    )
}

/// 渲染题目列表
///
/// 正确选项始终带 ✔ 标记，开启颜色时额外显示为绿色
pub fn render_questions(questions: &[Question], opts: &RenderOptions) -> String {
    let mut out = String::new();

    if questions.is_empty() {
        if opts.show_placeholder {
            let _ = writeln!(out, "{}", paint(EMPTY_PLACEHOLDER, DIM, opts));
        }
        return out;
    }

    let _ = writeln!(out, "{}", paint(RESULTS_HEADING, BOLD, opts));

    for (index, question) in questions.iter().enumerate() {
        let _ = writeln!(out);
        let _ = writeln!(out, "{}. {}", index + 1, question.question_text);

        if question.has_extra_image() {
            let _ = writeln!(out, "   {}", paint("[This question refers to an image]", YELLOW, opts));
        }

        if !question.reference_text.trim().is_empty() {
            let _ = writeln!(out, "   Reference: {}", question.reference_text);
        }

        for (idx, option) in question.options.iter().enumerate() {
            let label = option_label(idx);
            if option.is_correct {
                let line = format!("✔ {}. {}", label, option.text);
                let _ = writeln!(out, "   {}", paint(&line, GREEN, opts));
            } else {
                let _ = writeln!(out, "     {}. {}", label, option.text);
            }
        }

        if !question.solution_text.trim().is_empty() {
            let _ = writeln!(out, "   Solution: {}", question.solution_text);
        }
    }

    out
}

/// 把提交错误转换成给用户看的提示
pub fn render_error(err: &SubmitError, opts: &RenderOptions) -> String {
    let message = match err {
        SubmitError::MissingImage => "Please select an image first.",
        SubmitError::ImageRead { .. } => "Could not read the selected image.",
        SubmitError::Transport { .. } | SubmitError::BadStatus { .. } => {
            "Upload failed. Please check your connection and try again."
        }
        SubmitError::RelayRejected => "Error processing image",
        SubmitError::NoCandidate => "The model returned no response for this image.",
        SubmitError::MalformedJson { .. } => "Could not parse the questions returned by the model.",
        SubmitError::MissingApiKey => "No API key configured. Set GEMINI_API_KEY.",
        SubmitError::ClientBuild(_) => "Could not initialise the HTTP client.",
        SubmitError::Superseded { .. } => "A newer request replaced this one.",
    };
    format!("{}\n", paint(&format!("⚠ {}", message), YELLOW, opts))
}

// A, B, ... Z, 27, 28 ...
fn option_label(idx: usize) -> String {
    if idx < 26 {
        char::from(b'A' + idx as u8).to_string()
    } else {
        (idx + 1).to_string()
    }
}
