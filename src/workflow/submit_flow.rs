//! 提交流程 - 流程层
//!
//! 核心职责：定义"一次提交"的完整流程
//!
//! 流程顺序：
//! 1. 检查是否已选图（未选图直接返回，不发请求）
//! 2. 分配提交序号，置忙
//! 3. 调用提取器
//! 4. 只有最新一次提交的结果才会写回题目列表
//! 5. 无论结果如何都清除忙碌状态

use std::path::Path;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use tracing::{info, warn};

use crate::error::SubmitError;
use crate::infrastructure::ImageFile;
use crate::models::Question;
use crate::services::QuestionExtractor;
use crate::workflow::form_state::{FormPhase, FormState};

/// 提交按钮的两种文案
pub const SUBMIT_LABEL_IDLE: &str = "Generate Questions";
pub const SUBMIT_LABEL_BUSY: &str = "Generating...";

/// 一次成功提交的结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubmitOutcome {
    /// 提交序号，从 1 开始
    pub generation: u64,
    pub question_count: usize,
}

/// 提交流程
///
/// - 持有表单状态和提取器
/// - 允许并发调用 `submit`，较早发起的提交一旦被取代，其结果会被丢弃
/// - 锁只在同步区段内持有，不跨越 await
pub struct SubmitFlow {
    extractor: Box<dyn QuestionExtractor>,
    state: Mutex<FormState>,
    generation: AtomicU64,
    in_flight: AtomicUsize,
}

/// 忙碌标记守卫，drop 时清除
struct BusyGuard<'a> {
    in_flight: &'a AtomicUsize,
}

impl<'a> BusyGuard<'a> {
    fn enter(in_flight: &'a AtomicUsize) -> Self {
        in_flight.fetch_add(1, Ordering::SeqCst);
        Self { in_flight }
    }
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
    }
}

impl SubmitFlow {
    /// 创建新的提交流程
    pub fn new(extractor: Box<dyn QuestionExtractor>) -> Self {
        Self {
            extractor,
            state: Mutex::new(FormState::default()),
            generation: AtomicU64::new(0),
            in_flight: AtomicUsize::new(0),
        }
    }

    /// 选择图片文件
    ///
    /// 读取失败时保留原来的选择
    pub async fn select_file(&self, path: impl AsRef<Path>) -> Result<(), SubmitError> {
        let image = ImageFile::load(path).await?;
        self.select_image(image);
        Ok(())
    }

    /// 直接设置已在内存中的图片
    pub fn select_image(&self, image: ImageFile) {
        info!("🖼️ 已选择图片: {} ({})", image.file_name(), image.mime_type());
        self.state().select(image);
    }

    /// 提交当前图片
    ///
    /// # 返回
    /// - `Ok(SubmitOutcome)`: 题目列表已被整体替换
    /// - `Err(_)`: 题目列表保持不变
    pub async fn submit(&self) -> Result<SubmitOutcome, SubmitError> {
        let image = self.state().image.clone();
        let Some(image) = image else {
            warn!("⚠️ 未选择图片，取消提交");
            return Err(SubmitError::MissingImage);
        };

        let _busy = BusyGuard::enter(&self.in_flight);
        let generation = {
            let mut state = self.state();
            state.phase = FormPhase::Submitting;
            self.generation.fetch_add(1, Ordering::SeqCst) + 1
        };

        info!(
            "[提交 #{}] 使用 {} 提取 {}",
            generation,
            self.extractor.name(),
            image.file_name()
        );

        let result = self.extractor.extract(&image).await;

        // 持锁比较序号，新提交要先拿到锁才能改 phase
        let mut state = self.state();
        let latest = self.generation.load(Ordering::SeqCst);
        if generation != latest {
            warn!(
                "[提交 #{}] 已有更新的提交 #{}，丢弃本次结果",
                generation, latest
            );
            return Err(SubmitError::Superseded { generation, latest });
        }

        match result {
            Ok(questions) => {
                for (i, q) in questions.iter().enumerate() {
                    let count = q.correct_option_count();
                    if count != 1 {
                        warn!(
                            "[提交 #{}] 第 {} 题有 {} 个正确选项",
                            generation,
                            i + 1,
                            count
                        );
                    }
                }

                let question_count = questions.len();
                state.replace_questions(questions);
                info!("[提交 #{}] ✓ 提取到 {} 道题目", generation, question_count);

                Ok(SubmitOutcome {
                    generation,
                    question_count,
                })
            }
            Err(e) => {
                state.phase = FormPhase::Failed;
                warn!("[提交 #{}] ❌ 提交失败: {}", generation, e);
                Err(e)
            }
        }
    }

    /// 当前题目列表的快照
    pub fn questions(&self) -> Vec<Question> {
        self.state().questions.clone()
    }

    pub fn phase(&self) -> FormPhase {
        self.state().phase
    }

    pub fn has_image(&self) -> bool {
        self.state().image.is_some()
    }

    /// 是否有提交尚未完成
    pub fn is_busy(&self) -> bool {
        self.in_flight.load(Ordering::SeqCst) > 0
    }

    /// 提交按钮文案
    pub fn submit_label(&self) -> &'static str {
        if self.is_busy() {
            SUBMIT_LABEL_BUSY
        } else {
            SUBMIT_LABEL_IDLE
        }
    }

    /// 清空图片和题目
    pub fn reset(&self) {
        self.state().reset();
    }

    fn state(&self) -> MutexGuard<'_, FormState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
