//! This module provides functionality for generating completion candidates for
//! the ids taken by the mylist commands.

use clap::builder::StyledStr;
use clap_complete::CompletionCandidate;
use sekai_api::{ApiClient, HttpTransport};
use sekai_core::display::Labeled;

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum CompletableTable {
    MyList,
    Chart,
}

/// Generate completion candidates for records on the server.
/// Given the table name, returns a function that can be used to get completion candidates
/// from that table.
///
/// The default config and the stored session are used, so lists only complete once logged in.
pub fn complete_things(
    table: CompletableTable,
) -> impl Fn() -> Vec<CompletionCandidate> + Send + Sync + 'static {
    move || {
        let rt = match tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
        {
            Ok(rt) => rt,
            Err(e) => {
                eprintln!("Failed to create Tokio runtime: {e}");
                return vec![];
            }
        };

        let api = match crate::load_settings(None, None, None)
            .and_then(|settings| crate::init_context(&settings))
        {
            Ok(ctx) => ctx.api,
            Err(e) => {
                eprintln!("Failed to set up the client: {e}");
                return vec![];
            }
        };

        let candidates = match table {
            CompletableTable::MyList => rt.block_on(get_my_list_candidates(&api)),
            CompletableTable::Chart => rt.block_on(get_chart_candidates(&api)),
        };

        candidates
            .into_iter()
            .map(|(id, help)| CompletionCandidate::new(id).help(Some(help)))
            .collect::<Vec<_>>()
    }
}

async fn get_my_list_candidates(api: &ApiClient<HttpTransport>) -> Vec<(String, StyledStr)> {
    let lists = match api.get_my_lists().await {
        Ok(lists) => lists,
        Err(e) => {
            eprintln!("Failed to fetch lists: {e}");
            return vec![];
        }
    };

    lists
        .into_iter()
        .map(|list| {
            (
                list.id.to_string(),
                StyledStr::from(format!("\"{}\"", list.name)),
            )
        })
        .collect()
}

async fn get_chart_candidates(api: &ApiClient<HttpTransport>) -> Vec<(String, StyledStr)> {
    let charts = match api.get_charts().await {
        Ok(charts) => charts,
        Err(e) => {
            eprintln!("Failed to fetch charts: {e}");
            return vec![];
        }
    };

    charts
        .into_iter()
        .map(|chart| {
            (
                chart.id.to_string(),
                StyledStr::from(format!(
                    "\"{}\" ({} {})",
                    chart.song_name(),
                    chart.difficulty_type.label(),
                    chart.level
                )),
            )
        })
        .collect()
}
