//! 引擎侧的模板格式化。
//!
//! 语法：`{N}` 取第 N 个位置参数，`{name}` 取同名透传属性，`{{` 与 `}}` 输出字面量花括号；
//! 无法解析的占位符按原文保留，格式化永不失败。

use std::collections::BTreeMap;

use logbridge_core::{PropertyValue, ScalarValue};

/// 按位置参数与属性展开模板。
pub fn format_template(
    template: &str,
    parameters: &[ScalarValue],
    properties: &BTreeMap<String, PropertyValue>,
) -> String {
    if !template.contains(['{', '}']) {
        return template.to_owned();
    }

    let mut output = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(index) = rest.find(['{', '}']) {
        output.push_str(&rest[..index]);
        let tail = &rest[index..];

        if tail.starts_with("{{") {
            output.push('{');
            rest = &tail[2..];
            continue;
        }
        if tail.starts_with("}}") {
            output.push('}');
            rest = &tail[2..];
            continue;
        }
        if tail.starts_with('}') {
            output.push('}');
            rest = &tail[1..];
            continue;
        }

        // tail 以 '{' 开头。
        match tail[1..].find(['}', '{']) {
            Some(end) if tail.as_bytes()[end + 1] == b'}' => {
                let key = &tail[1..end + 1];
                match resolve(key, parameters, properties) {
                    Some(value) => output.push_str(&value),
                    None => output.push_str(&tail[..end + 2]),
                }
                rest = &tail[end + 2..];
            }
            _ => {
                output.push('{');
                rest = &tail[1..];
            }
        }
    }
    output.push_str(rest);
    output
}

fn resolve(
    key: &str,
    parameters: &[ScalarValue],
    properties: &BTreeMap<String, PropertyValue>,
) -> Option<String> {
    let key = key.trim();
    if key.is_empty() {
        return None;
    }
    if let Ok(index) = key.parse::<usize>() {
        return parameters.get(index).map(ToString::to_string);
    }
    properties.get(key).map(ToString::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn no_properties() -> BTreeMap<String, PropertyValue> {
        BTreeMap::new()
    }

    #[test]
    fn positional_placeholders_use_parameters() {
        let params = [ScalarValue::from("a"), ScalarValue::from(2_i64)];
        assert_eq!(
            format_template("{1}-{0}-{1}", &params, &no_properties()),
            "2-a-2"
        );
    }

    #[test]
    fn named_placeholders_use_properties() {
        let mut properties = no_properties();
        properties.insert("user".into(), PropertyValue::from("alice"));
        assert_eq!(format_template("hi {user}", &[], &properties), "hi alice");
    }

    #[test]
    fn unresolvable_placeholders_stay_verbatim() {
        let params = [ScalarValue::from("x")];
        assert_eq!(
            format_template("{0} {1} {missing} {}", &params, &no_properties()),
            "x {1} {missing} {}"
        );
    }

    #[test]
    fn braces_can_be_escaped() {
        assert_eq!(
            format_template("{{0}} {0} }", &[ScalarValue::Null], &no_properties()),
            "{0}  }"
        );
    }

    #[test]
    fn unterminated_brace_is_literal() {
        assert_eq!(
            format_template(
                "open {0 and {1}",
                &[ScalarValue::from("a"), ScalarValue::from("b")],
                &no_properties()
            ),
            "open {0 and b"
        );
    }
}
