//! Bridge WASM <-> JavaScript cho các tiện ích phím tắt, nhóm thời gian và đường dẫn API.

use std::collections::BTreeMap;

use care_core::{
    parse_timestamp, CareError, DateBucket, RouteTemplate, ShortcutConfig,
    DEFAULT_HIERARCHY_SEPARATOR,
};
use care_keymap::{ActiveBinding, KeyChord, Keymap, KeymapError, Resolution};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_wasm_bindgen::{from_value, to_value};
use wasm_bindgen::prelude::*;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JsShortcutConfig {
    #[serde(default)]
    hierarchy_separator: Option<String>,
    #[serde(default)]
    global_scope: Option<String>,
}

impl From<JsShortcutConfig> for ShortcutConfig {
    fn from(cfg: JsShortcutConfig) -> Self {
        let mut base = ShortcutConfig::default();
        if let Some(separator) = cfg.hierarchy_separator {
            base.hierarchy_separator = separator;
        }
        if let Some(scope) = cfg.global_scope {
            base.global_scope = scope;
        }
        base
    }
}

/// Một nhóm thời gian trả về cho JS, kèm chỉ số phần tử trong mảng đầu vào.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct JsBucketGroup {
    pub bucket: DateBucket,
    pub label: &'static str,
    pub indices: Vec<usize>,
}

#[wasm_bindgen(js_name = expandShortcutContext)]
pub fn expand_shortcut_context(
    context_key: &str,
    hierarchy_separator: Option<String>,
) -> Vec<String> {
    install_panic_hook();
    let separator =
        hierarchy_separator.unwrap_or_else(|| DEFAULT_HIERARCHY_SEPARATOR.to_string());
    care_core::expand_shortcut_context(context_key, &separator)
}

#[wasm_bindgen(js_name = bucketTimestamps)]
pub fn bucket_timestamps_js(
    timestamps: JsValue,
    anchor: Option<String>,
) -> Result<JsValue, JsValue> {
    install_panic_hook();
    let timestamps: Vec<Option<String>> = from_value(timestamps).map_err(|err| {
        JsValue::from_str(&format!("Không đọc được danh sách thời gian: {err}"))
    })?;

    let groups = bucket_timestamps(&timestamps, anchor.as_deref())
        .map_err(|err| JsValue::from_str(&format_care_error(err)))?;

    to_value(&groups).map_err(|err| JsValue::from_str(&format!("Không serialize nhóm: {err}")))
}

#[wasm_bindgen(js_name = renderRoute)]
pub fn render_route_js(
    template: &str,
    params: JsValue,
    query: Option<JsValue>,
) -> Result<String, JsValue> {
    install_panic_hook();
    let params: BTreeMap<String, String> = if params.is_undefined() || params.is_null() {
        BTreeMap::new()
    } else {
        from_value(params)
            .map_err(|err| JsValue::from_str(&format!("Không đọc được tham số: {err}")))?
    };
    let query: Vec<(String, String)> = match query {
        Some(js_query) => from_value(js_query)
            .map_err(|err| JsValue::from_str(&format!("Không đọc được query: {err}")))?,
        None => Vec::new(),
    };

    render_route(template, &params, &query)
        .map_err(|err| JsValue::from_str(&format_care_error(err)))
}

#[wasm_bindgen(js_name = resolveShortcut)]
pub fn resolve_shortcut_js(
    keymap_json: &str,
    context_key: &str,
    chord: &str,
    config: Option<JsValue>,
) -> Result<JsValue, JsValue> {
    install_panic_hook();
    let cfg = read_config(config)?;
    let resolution = resolve_shortcut(keymap_json, context_key, chord, &cfg)
        .map_err(|err| JsValue::from_str(&format_keymap_error(err)))?;

    to_value(&resolution)
        .map_err(|err| JsValue::from_str(&format!("Không serialize kết quả: {err}")))
}

#[wasm_bindgen(js_name = activeShortcuts)]
pub fn active_shortcuts_js(
    keymap_json: &str,
    context_key: &str,
    config: Option<JsValue>,
) -> Result<JsValue, JsValue> {
    install_panic_hook();
    let cfg = read_config(config)?;
    let active = active_shortcuts(keymap_json, context_key, &cfg)
        .map_err(|err| JsValue::from_str(&format_keymap_error(err)))?;

    to_value(&active)
        .map_err(|err| JsValue::from_str(&format!("Không serialize kết quả: {err}")))
}

/// Gom chỉ số phần tử theo nhóm thời gian; `anchor` mặc định là thời điểm hiện tại.
pub fn bucket_timestamps(
    timestamps: &[Option<String>],
    anchor: Option<&str>,
) -> Result<Vec<JsBucketGroup>, CareError> {
    let anchor = match anchor {
        Some(raw) => parse_timestamp(raw)?,
        None => Utc::now(),
    };

    let mut indexed = Vec::with_capacity(timestamps.len());
    for (index, raw) in timestamps.iter().enumerate() {
        let parsed = raw.as_deref().map(parse_timestamp).transpose()?;
        indexed.push((index, parsed));
    }

    Ok(care_core::group_by_bucket(indexed, |(_, ts)| *ts, anchor)
        .into_iter()
        .map(|group| JsBucketGroup {
            bucket: group.bucket,
            label: group.bucket.label(),
            indices: group.items.into_iter().map(|(index, _)| index).collect(),
        })
        .collect())
}

pub fn render_route(
    template: &str,
    params: &BTreeMap<String, String>,
    query: &[(String, String)],
) -> Result<String, CareError> {
    RouteTemplate::parse(template)?.render_with_query(params, query)
}

pub fn resolve_shortcut(
    keymap_json: &str,
    context_key: &str,
    chord: &str,
    config: &ShortcutConfig,
) -> Result<Option<Resolution>, KeymapError> {
    let keymap = Keymap::from_json_str(keymap_json, config)?;
    let chord = KeyChord::parse(chord)?;
    Ok(keymap.resolve(context_key, &chord))
}

pub fn active_shortcuts(
    keymap_json: &str,
    context_key: &str,
    config: &ShortcutConfig,
) -> Result<Vec<ActiveBinding>, KeymapError> {
    let keymap = Keymap::from_json_str(keymap_json, config)?;
    Ok(keymap.active_bindings(context_key))
}

fn read_config(config: Option<JsValue>) -> Result<ShortcutConfig, JsValue> {
    match config {
        Some(js_cfg) if !js_cfg.is_undefined() && !js_cfg.is_null() => {
            let cfg: JsShortcutConfig = from_value(js_cfg)
                .map_err(|err| JsValue::from_str(&format!("Không đọc được config: {err}")))?;
            Ok(ShortcutConfig::from(cfg))
        }
        _ => Ok(ShortcutConfig::default()),
    }
}

fn install_panic_hook() {
    #[cfg(target_arch = "wasm32")]
    console_error_panic_hook::set_once();
}

fn format_care_error(err: CareError) -> String {
    format!("Care error: {err}")
}

fn format_keymap_error(err: KeymapError) -> String {
    format!("Keymap error: {err}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_config_keeps_defaults() {
        let cfg = ShortcutConfig::from(JsShortcutConfig {
            hierarchy_separator: Some("/".to_string()),
            global_scope: None,
        });
        assert_eq!(cfg.hierarchy_separator, "/");
        assert_eq!(cfg.global_scope, "global");
    }

    #[test]
    fn default_separator_when_missing() {
        assert_eq!(
            expand_shortcut_context("facility:patient", None),
            vec!["facility".to_string(), "facility:patient".to_string()]
        );
        assert_eq!(
            expand_shortcut_context("a/b", Some("/".to_string())),
            vec!["a".to_string(), "a/b".to_string()]
        );
    }

    #[test]
    fn buckets_report_input_indices() {
        let timestamps = vec![
            Some("2024-03-01T10:00:00Z".to_string()),
            None,
            Some("2024-03-15T01:00:00Z".to_string()),
            Some("2024-03-14T23:00:00Z".to_string()),
        ];
        let groups =
            bucket_timestamps(&timestamps, Some("2024-03-15T09:00:00Z")).expect("mốc hợp lệ");

        assert_eq!(
            groups,
            vec![
                JsBucketGroup {
                    bucket: DateBucket::Today,
                    label: "Hôm nay",
                    indices: vec![2],
                },
                JsBucketGroup {
                    bucket: DateBucket::Yesterday,
                    label: "Hôm qua",
                    indices: vec![3],
                },
                JsBucketGroup {
                    bucket: DateBucket::LastThirtyDays,
                    label: "30 ngày qua",
                    indices: vec![0],
                },
                JsBucketGroup {
                    bucket: DateBucket::Undated,
                    label: "Không rõ thời gian",
                    indices: vec![1],
                },
            ]
        );
    }

    #[test]
    fn bad_timestamp_is_reported() {
        let timestamps = vec![Some("hôm qua".to_string())];
        assert!(matches!(
            bucket_timestamps(&timestamps, None),
            Err(CareError::Parse(_))
        ));
    }

    #[test]
    fn route_with_query() {
        let params = BTreeMap::from([("id".to_string(), "42".to_string())]);
        let query = vec![("mode".to_string(), "print".to_string())];
        assert_eq!(
            render_route("/api/v1/patient/{id}/", &params, &query).expect("đủ tham số"),
            "/api/v1/patient/42/?mode=print"
        );
    }

    #[test]
    fn resolves_against_inline_keymap() {
        let keymap = r#"{"bindings": [
            {"scope": "facility:patient", "keys": "ctrl+p", "action": "patient.print"}
        ]}"#;
        let config = ShortcutConfig::default();
        let hit = resolve_shortcut(keymap, "facility:patient:home", "Ctrl+P", &config)
            .expect("keymap hợp lệ")
            .expect("có binding");
        assert_eq!(hit.action, "patient.print");

        assert!(resolve_shortcut(keymap, "facility", "ctrl+p", &ShortcutConfig::default())
            .expect("keymap hợp lệ")
            .is_none());
        assert!(resolve_shortcut(keymap, "facility", "ctrl+", &ShortcutConfig::default()).is_err());

        let active = active_shortcuts(keymap, "facility:patient", &ShortcutConfig::default())
            .expect("keymap hợp lệ");
        assert_eq!(active.len(), 1);
    }
}
