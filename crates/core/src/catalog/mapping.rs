//! Conversion of catalog records into the public show shape.

use std::collections::BTreeMap;

use super::types::{CatalogItem, MediaAsset, ShowQuality, ShowSummary};

/// Rating shown for every show until ratings are collected.
const DEFAULT_RATING: f64 = 4.0;

/// Render a length in seconds as whole minutes, `"M:00"`.
///
/// Anything shorter than a minute, negative lengths included, shows as one
/// minute. Missing, zero or non-finite lengths render as an empty string.
pub fn format_duration(seconds: Option<f64>) -> String {
    match seconds {
        Some(secs) if secs.is_finite() && secs != 0.0 => {
            let minutes = ((secs / 60.0).round() as i64).max(1);
            format!("{}:00", minutes)
        }
        _ => String::new(),
    }
}

fn archive_url(asset: Option<&MediaAsset>) -> String {
    asset
        .and_then(|a| {
            a.streaming_url
                .clone()
                .filter(|u| !u.is_empty())
                .or_else(|| a.download_url.clone().filter(|u| !u.is_empty()))
        })
        .unwrap_or_default()
}

/// Map one item and its representative asset, if any.
pub fn map_show(item: &CatalogItem, asset: Option<&MediaAsset>) -> ShowSummary {
    ShowSummary {
        id: item.id.to_string(),
        title: item.title.clone().unwrap_or_default(),
        series: item.identifier.clone().unwrap_or_default(),
        duration: format_duration(asset.and_then(|a| a.duration)),
        year: item.year.clone().unwrap_or_default(),
        description: item.description.clone().unwrap_or_default(),
        archive_url: archive_url(asset),
        genre: Vec::new(),
        actors: Vec::new(),
        rating: DEFAULT_RATING,
        play_count: item.downloads,
        tags: Vec::new(),
        quality: ShowQuality::default(),
    }
}

/// Map items in order, pairing each with its representative asset.
pub fn map_shows(items: &[CatalogItem], assets: &BTreeMap<i64, MediaAsset>) -> Vec<ShowSummary> {
    items
        .iter()
        .map(|item| map_show(item, assets.get(&item.id)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::fixtures;

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(Some(1695.0)), "28:00");
        assert_eq!(format_duration(Some(20.0)), "1:00");
        assert_eq!(format_duration(Some(89.0)), "1:00");
        assert_eq!(format_duration(Some(90.0)), "2:00");
        assert_eq!(format_duration(Some(0.0)), "");
        assert_eq!(format_duration(Some(-5.0)), "1:00");
        assert_eq!(format_duration(Some(-600.0)), "1:00");
        assert_eq!(format_duration(Some(f64::INFINITY)), "");
        assert_eq!(format_duration(Some(f64::NAN)), "");
        assert_eq!(format_duration(None), "");
    }

    #[test]
    fn test_map_show_with_asset() {
        let item = fixtures::catalog_item(42, "Mars Is Heaven");
        let asset = fixtures::media_asset(42, Some("https://archive.org/s.mp3"), Some(1695.0));

        let show = map_show(&item, Some(&asset));
        assert_eq!(show.id, "42");
        assert_eq!(show.title, "Mars Is Heaven");
        assert_eq!(show.series, item.identifier.clone().unwrap());
        assert_eq!(show.duration, "28:00");
        assert_eq!(show.archive_url, "https://archive.org/s.mp3");
        assert_eq!(show.play_count, item.downloads);
        assert_eq!(show.rating, 4.0);
        assert_eq!(show.quality, ShowQuality::default());
        assert!(show.genre.is_empty() && show.actors.is_empty() && show.tags.is_empty());
    }

    #[test]
    fn test_archive_url_falls_back_to_download() {
        let item = fixtures::catalog_item(1, "t");
        let mut asset = fixtures::media_asset(1, None, None);
        asset.download_url = Some("https://archive.org/d.mp3".to_string());

        assert_eq!(map_show(&item, Some(&asset)).archive_url, "https://archive.org/d.mp3");
    }

    #[test]
    fn test_map_show_without_asset_or_text() {
        let item = CatalogItem {
            id: 9,
            identifier: None,
            title: None,
            description: None,
            year: None,
            downloads: 0,
        };

        let show = map_show(&item, None);
        assert_eq!(show.title, "");
        assert_eq!(show.series, "");
        assert_eq!(show.year, "");
        assert_eq!(show.duration, "");
        assert_eq!(show.archive_url, "");
    }

    #[test]
    fn test_map_shows_keeps_order() {
        let items = vec![fixtures::catalog_item(2, "b"), fixtures::catalog_item(1, "a")];
        let mut assets = BTreeMap::new();
        assets.insert(1, fixtures::media_asset(1, Some("u1"), Some(60.0)));

        let shows = map_shows(&items, &assets);
        assert_eq!(shows[0].id, "2");
        assert_eq!(shows[0].archive_url, "");
        assert_eq!(shows[1].archive_url, "u1");
    }
}
