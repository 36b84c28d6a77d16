use crate::services::resource::{ResourceMap, substitute_values};

/// Produce the target language file for a fresh source language file.
///
/// Without a target map the result is the source text itself: every string
/// shows up in the source language until someone translates it. With a
/// target map its values are written into the source text, so key order and
/// formatting follow the source and keys new upstream appear untranslated.
pub fn merge(source_text: &str, target: Option<&ResourceMap>) -> String {
    match target {
        Some(translations) => substitute_values(source_text, translations),
        None => source_text.to_string(),
    }
}

/// Pick the translations that feed [`merge`].
///
/// Translations kept in the local mirror are compared against the source
/// file they were merged from, so stale placeholders never mask updated
/// source text. A target file shipped inside the archive is layered on top:
/// its real translations win key by key and mirror translations fill the
/// keys it leaves out. Values equal to the source are placeholders and are
/// dropped from both.
pub fn select_translations(
    source: &ResourceMap,
    fetched_target: Option<&ResourceMap>,
    stored_target: Option<&ResourceMap>,
    previous_source: Option<&ResourceMap>,
) -> Option<ResourceMap> {
    let local =
        stored_target.map(|stored| stored.translations_against(previous_source.unwrap_or(source)));
    let shipped = fetched_target.map(|fetched| fetched.translations_against(source));

    match (local, shipped) {
        (None, None) => None,
        (Some(local), None) => Some(local),
        (None, Some(shipped)) => Some(shipped),
        (Some(local), Some(shipped)) => Some(
            local
                .iter()
                .chain(shipped.iter())
                .map(|(key, value)| (key.to_string(), value.to_string()))
                .collect(),
        ),
    }
}

/// Map encoded by the merged text: source keys in source order, translated
/// where a translation exists.
pub fn effective_target(source: &ResourceMap, translations: Option<&ResourceMap>) -> ResourceMap {
    source
        .iter()
        .map(|(key, value)| {
            let value = translations.and_then(|t| t.get(key)).unwrap_or(value);
            (key.to_string(), value.to_string())
        })
        .collect()
}
