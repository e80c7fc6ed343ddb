//! Statement builders for the catalog tables.
//!
//! The store takes a single SQL string per request, so every piece of
//! caller text goes through [`quote`] and every identifier is an `i64`.

const SHOW_COLUMNS: &str = "id, identifier, title, description, year, downloads";

/// Escape text for use inside a single-quoted SQL literal.
pub fn quote(text: &str) -> String {
    text.replace('\'', "''")
}

fn search_predicate(term: &str) -> String {
    let pattern = format!("'%{}%'", quote(term));
    format!(
        "LOWER(rs.title) LIKE {p} OR LOWER(rs.description) LIKE {p} OR LOWER(rs.identifier) LIKE {p}",
        p = pattern
    )
}

pub fn search_count(term: &str) -> String {
    format!(
        "SELECT COUNT(*) AS c FROM radio_shows rs WHERE {}",
        search_predicate(term)
    )
}

pub fn search_rows(term: &str, limit: i64, offset: i64) -> String {
    format!(
        "SELECT rs.id, rs.identifier, rs.title, rs.description, rs.year, rs.downloads \
         FROM radio_shows rs WHERE {} ORDER BY rs.downloads DESC LIMIT {} OFFSET {}",
        search_predicate(term),
        limit,
        offset
    )
}

/// One grouped asset row per show. Returns `None` when there are no ids.
pub fn representative_assets(show_ids: &[i64]) -> Option<String> {
    if show_ids.is_empty() {
        return None;
    }
    let in_list = show_ids
        .iter()
        .map(i64::to_string)
        .collect::<Vec<_>>()
        .join(",");
    Some(format!(
        "SELECT radio_show_id, MIN(id) AS id, MIN(streaming_url) AS streaming_url, \
         MIN(download_url) AS download_url, MIN(duration) AS duration \
         FROM audio_files WHERE radio_show_id IN ({}) GROUP BY radio_show_id",
        in_list
    ))
}

pub fn top_shows(count: i64) -> String {
    format!(
        "SELECT {} FROM radio_shows ORDER BY downloads DESC LIMIT {}",
        SHOW_COLUMNS, count
    )
}

pub fn random_shows(count: i64) -> String {
    format!(
        "SELECT {} FROM radio_shows ORDER BY RANDOM() LIMIT {}",
        SHOW_COLUMNS, count
    )
}

pub fn show_by_id(id: i64) -> String {
    format!(
        "SELECT {} FROM radio_shows WHERE id = {} LIMIT 1",
        SHOW_COLUMNS, id
    )
}

pub fn assets_for_show(id: i64, max: i64) -> String {
    format!(
        "SELECT id, radio_show_id, streaming_url, download_url, duration \
         FROM audio_files WHERE radio_show_id = {} ORDER BY id LIMIT {}",
        id, max
    )
}
