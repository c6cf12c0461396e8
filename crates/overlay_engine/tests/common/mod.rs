#![allow(dead_code)]

use std::sync::Once;

pub const NOT_IN_LIST: &str = "notinmylist";

pub fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(overlay_logging::initialize_for_tests);
}

/// `(name, status class, status text)` per row of a top ranking table.
pub fn top_ranking_page(rows: &[(&str, &str, &str)]) -> String {
    let rows: String = rows
        .iter()
        .enumerate()
        .map(|(rank, (name, status_class, status_text))| {
            format!(
                r#"<tr class="ranking-list">
                    <td class="rank ac"><span>{rank}</span></td>
                    <td class="title al va-t word-break">
                        <div class="detail"><div class="di-ib clearfix">
                            <h3 class="hoverinfo_trigger fl-l fs14 fw-b anime_ranking_h3"><a href="/anime/{rank}">{name}</a></h3>
                        </div></div>
                    </td>
                    <td class="status"><a class="Lightbox_AddEdit btn-addEdit-large js-anime-watch-status {status_class}">{status_text}</a></td>
                </tr>"#
            )
        })
        .collect();
    format!(
        r#"<html><head><title>Top Anime</title></head><body>
            <table class="top-ranking-table">
                <tr class="table-header"><td>Rank</td><td>Title</td><td>Status</td></tr>
                {rows}
            </table>
        </body></html>"#
    )
}

/// Ranking page where every entry is in no list yet.
pub fn plain_ranking(names: &[&str]) -> String {
    let rows: Vec<(&str, &str, &str)> = names
        .iter()
        .map(|name| (*name, NOT_IN_LIST, "Add to list"))
        .collect();
    top_ranking_page(&rows)
}

pub fn seasonal_page(rows: &[(&str, &str, &str)]) -> String {
    let cards: String = rows
        .iter()
        .map(|(name, status_class, status_text)| {
            format!(
                r#"<div class="js-anime-category-producer seasonal-anime js-seasonal-anime">
                    <div class="title"><div class="title-text">
                        <h2 class="h2_anime_title"><a href="/anime/x">{name}</a></h2>
                    </div></div>
                    <div class="information"><div class="status">
                        <a class="js-anime-watch-status {status_class}"><span>{status_text}</span></a>
                    </div></div>
                </div>"#
            )
        })
        .collect();
    format!(
        r#"<html><body>
            <div class="seasonal-anime-list js-seasonal-anime-list">
                {cards}
                <div class="js-middle_ad"><span>advertisement</span></div>
            </div>
        </body></html>"#
    )
}

pub fn detail_page(name: &str, status_class: &str, status_text: &str) -> String {
    format!(
        r#"<html><body><div id="contentWrapper">
            <div><div class="h1-title"><h1 class="title-name h1_bold_none"><strong>{name}</strong></h1></div></div>
            <div id="content"><div class="anime-detail-header-stats">
                <div class="user-status-block js-user-status-block">
                    <a id="myinfo_status" class="btn-user-status-add-list js-form-user-status {status_class}">{status_text}</a>
                </div>
                <div class="user-status-block" style="display: none;">
                    <select id="myinfo_status" class="myinfo_updateInfo"><option selected>Watching</option></select>
                </div>
            </div></div>
        </div></body></html>"#
    )
}

pub fn unsupported_page() -> String {
    r#"<html><body><div class="my_statistics"><div class="widget-header">Stats</div></div></body></html>"#
        .to_string()
}
