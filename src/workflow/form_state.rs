//! 表单状态
//!
//! 封装"选了哪张图、当前有哪些题目、处于哪个阶段"这一信息

use std::fmt::Display;
use std::sync::Arc;

use crate::infrastructure::ImageFile;
use crate::models::Question;

/// 表单所处阶段
///
/// `Idle → Selected → Submitting → {Succeeded | Failed}`，重新选图回到 `Selected`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FormPhase {
    #[default]
    Idle,
    Selected,
    Submitting,
    Succeeded,
    Failed,
}

/// 表单的瞬时状态，不做任何持久化
#[derive(Debug, Default)]
pub struct FormState {
    /// 当前选中的图片
    pub image: Option<Arc<ImageFile>>,

    /// 最近一次成功提取的题目
    pub questions: Vec<Question>,

    pub phase: FormPhase,
}

impl FormState {
    pub fn select(&mut self, image: ImageFile) {
        self.image = Some(Arc::new(image));
        self.phase = FormPhase::Selected;
    }

    /// 用新结果整体替换题目列表
    pub fn replace_questions(&mut self, questions: Vec<Question>) {
        self.questions = questions;
        self.phase = FormPhase::Succeeded;
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

impl Display for FormPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            FormPhase::Idle => "idle",
            FormPhase::Selected => "selected",
            FormPhase::Submitting => "submitting",
            FormPhase::Succeeded => "succeeded",
            FormPhase::Failed => "failed",
        };
        write!(f, "{}", name)
    }
}
