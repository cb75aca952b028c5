use serde::{Deserialize, Serialize};

/// 题库中的一道题
///
/// 加载后不再修改；`year` 和 `marks` 在反序列化时统一为整数
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    pub subject: String,
    #[serde(deserialize_with = "deserialize_int")]
    pub year: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exam: Option<String>,
    #[serde(default)]
    pub topic: String,
    #[serde(default)]
    pub subtopic: String,
    #[serde(deserialize_with = "deserialize_int")]
    pub marks: i32,
    pub question: String,
}

/// 整个会话期间只读的数据集
pub type Dataset = Vec<Question>;

// 数据来源里 year / marks 既可能是数字也可能是字符串
pub(crate) fn deserialize_int<'de, D>(deserializer: D) -> Result<i32, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::de::Visitor;
    use std::fmt;

    struct IntVisitor;

    impl<'de> Visitor<'de> for IntVisitor {
        type Value = i32;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("an integer or a numeric string")
        }

        fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
        where
            E: serde::de::Error,
        {
            parse_whole_number(value)
                .ok_or_else(|| E::invalid_value(serde::de::Unexpected::Str(value), &self))
        }

        fn visit_i64<E>(self, value: i64) -> Result<Self::Value, E>
        where
            E: serde::de::Error,
        {
            i32::try_from(value)
                .map_err(|_| E::invalid_value(serde::de::Unexpected::Signed(value), &self))
        }

        fn visit_u64<E>(self, value: u64) -> Result<Self::Value, E>
        where
            E: serde::de::Error,
        {
            i32::try_from(value)
                .map_err(|_| E::invalid_value(serde::de::Unexpected::Unsigned(value), &self))
        }

        fn visit_f64<E>(self, value: f64) -> Result<Self::Value, E>
        where
            E: serde::de::Error,
        {
            whole_f64_to_i32(value)
                .ok_or_else(|| E::invalid_value(serde::de::Unexpected::Float(value), &self))
        }
    }

    deserializer.deserialize_any(IntVisitor)
}

// 预设里的 marks 允许写成字符串或数字，统一成字符串再交给 MarksFilter 解析
pub(crate) fn deserialize_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::de::Visitor;
    use std::fmt;

    struct TextVisitor;

    impl<'de> Visitor<'de> for TextVisitor {
        type Value = String;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("a string or a number")
        }

        fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
        where
            E: serde::de::Error,
        {
            Ok(value.to_string())
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
    }

    deserializer.deserialize_any(TextVisitor)
}

/// 解析整数文本，允许 "5" / " 5 " / "5.0"
pub fn parse_whole_number(value: &str) -> Option<i32> {
    let trimmed = value.trim();
    if let Ok(n) = trimmed.parse::<i32>() {
        return Some(n);
    }
    trimmed.parse::<f64>().ok().and_then(whole_f64_to_i32)
}

fn whole_f64_to_i32(value: f64) -> Option<i32> {
    if value.is_finite()
        && value.fract() == 0.0
        && value >= f64::from(i32::MIN)
        && value <= f64::from(i32::MAX)
    {
        Some(value as i32)
    } else {
        None
    }
}
