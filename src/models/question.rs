use serde::{Deserialize, Serialize};

/// 从图片中提取出的一道选择题
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    pub question_text: String,

    /// 题目是否附带额外图片，非空即表示存在
    #[serde(default, deserialize_with = "deserialize_loose_string")]
    pub is_extra_image_exist: String,

    #[serde(default, deserialize_with = "deserialize_loose_string")]
    pub reference_text: String,

    #[serde(default, deserialize_with = "deserialize_loose_string")]
    pub solution_text: String,

    #[serde(default)]
    pub options: Vec<AnswerOption>,
}

/// 选项
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerOption {
    pub text: String,
    #[serde(default)]
    pub is_correct: bool,
}

impl Question {
    pub fn new(question_text: impl Into<String>, options: Vec<AnswerOption>) -> Self {
        Self {
            question_text: question_text.into(),
            is_extra_image_exist: String::new(),
            reference_text: String::new(),
            solution_text: String::new(),
            options,
        }
    }

    pub fn has_extra_image(&self) -> bool {
        !self.is_extra_image_exist.trim().is_empty()
    }

    /// 正确选项的数量，模型应保证恰好为 1，本地不强制
    pub fn correct_option_count(&self) -> usize {
        self.options.iter().filter(|o| o.is_correct).count()
    }
}

impl AnswerOption {
    pub fn new(text: impl Into<String>, is_correct: bool) -> Self {
        Self {
            text: text.into(),
            is_correct,
        }
    }
}

// 模型偶尔会把字符串字段输出成 bool / 数字 / null，统一转成字符串
fn deserialize_loose_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::de::Visitor;
    use std::fmt;

    struct LooseStringVisitor;

    impl<'de> Visitor<'de> for LooseStringVisitor {
        type Value = String;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("a string, boolean, number or null")
        }

        fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
        where
            E: serde::de::Error,
        {
            Ok(value.to_string())
        }

        fn visit_bool<E>(self, value: bool) -> Result<Self::Value, E>
        where
            E: serde::de::Error,
        {
            // false 等同于不存在
            Ok(if value { "true".to_string() } else { String::new() })
        }

        fn visit_i64<E>(self, value: i64) -> Result<Self::Value, E>
        where
            E: serde::de::Error,
        {
            Ok(value.to_string())
        }

        fn visit_u64<E>(self, value: u64) -> Result<Self::Value, E>
        where
            E: serde::de::Error,
        {
            Ok(value.to_string())
        }

        fn visit_f64<E>(self, value: f64) -> Result<Self::Value, E>
        where
            E: serde::de::Error,
        {
            Ok(value.to_string())
        }

        fn visit_unit<E>(self) -> Result<Self::Value, E>
        where
            E: serde::de::Error,
        {
            Ok(String::new())
        }

        fn visit_none<E>(self) -> Result<Self::Value, E>
        where
            E: serde::de::Error,
        {
            Ok(String::new())
        }
    }

    deserializer.deserialize_any(LooseStringVisitor)
}
