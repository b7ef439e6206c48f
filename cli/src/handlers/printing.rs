//! Handles displaying the output of various commands in a human readable format.

use std::fmt::Write;

use sekai_core::{
    display::{Labeled, attachment_view},
    route::Route,
};
use sekai_types::{
    Artist, Chart, MyList, MyListChart, MyListChartAttachment, Singer, Song, Unit, User,
};

pub fn artist_list(prefix: &str, artists: &[Artist]) -> Result<String, std::fmt::Error> {
    let mut output = String::new();

    writeln!(output, "{prefix}:")?;
    for artist in artists {
        writeln!(
            output,
            "\t{}: \"{}\" ({}),",
            artist.id, artist.name, artist.kana
        )?;
    }

    Ok(output)
}

pub fn singer_list(prefix: &str, singers: &[Singer]) -> Result<String, std::fmt::Error> {
    let mut output = String::new();

    writeln!(output, "{prefix}:")?;
    for singer in singers {
        writeln!(output, "\t{}: \"{}\",", singer.id, singer.name)?;
    }

    Ok(output)
}

pub fn unit_list(prefix: &str, units: &[Unit]) -> Result<String, std::fmt::Error> {
    let mut output = String::new();

    writeln!(output, "{prefix}:")?;
    for unit in units {
        writeln!(output, "\t{}: \"{}\",", unit.id, unit.name)?;
    }

    Ok(output)
}

pub fn song_list(prefix: &str, songs: &[Song]) -> Result<String, std::fmt::Error> {
    let mut output = String::new();

    writeln!(output, "{prefix}:")?;
    for song in songs {
        writeln!(
            output,
            "\t{}: \"{}\" (lyrics: {}, music: {}, arrangement: {}){},",
            song.id,
            song.name,
            song.lyrics_name(),
            song.music_name(),
            song.arrangement_name(),
            if song.deleted { " [deleted]" } else { "" }
        )?;
    }

    Ok(output)
}

pub fn song(song: &Song) -> Result<String, std::fmt::Error> {
    let mut output = String::new();

    writeln!(output, "Song {}: \"{}\" ({})", song.id, song.name, song.kana)?;
    song_details(&mut output, song, "\t")?;

    Ok(output)
}

/// The fields of a song below its title line, each line prefixed with `indent`.
fn song_details(output: &mut String, song: &Song, indent: &str) -> std::fmt::Result {
    writeln!(output, "{indent}Lyrics: {}", song.lyrics_name())?;
    writeln!(output, "{indent}Music: {}", song.music_name())?;
    writeln!(output, "{indent}Arrangement: {}", song.arrangement_name())?;
    writeln!(output, "{indent}Thumbnail: {}", song.thumbnail)?;
    if !song.original_video.is_empty() {
        writeln!(output, "{indent}Original Video: {}", song.original_video)?;
    }
    if let Some(release_time) = song.release_time {
        writeln!(output, "{indent}Released: {}", release_time.format("%Y-%m-%d"))?;
    }
    if song.deleted {
        writeln!(output, "{indent}Deleted: true")?;
    }
    let units: Vec<&str> = song.units.iter().map(|unit| unit.name.as_str()).collect();
    writeln!(output, "{indent}Units: {units:?}")?;
    let videos: Vec<&str> = song
        .music_video_types
        .iter()
        .map(|kind| kind.label())
        .collect();
    writeln!(output, "{indent}Music Videos: {videos:?}")?;

    writeln!(output, "{indent}Vocal Patterns: [")?;
    for pattern in &song.vocal_patterns {
        let singers: Vec<String> = pattern
            .singers
            .iter()
            .map(|singer| format!("{}@{}", singer.name, singer.position))
            .collect();
        writeln!(
            output,
            "{indent}\t{}: \"{}\" {singers:?},",
            pattern.id, pattern.name
        )?;
    }
    writeln!(output, "{indent}]")
}

fn chart_line(chart: &Chart) -> String {
    format!(
        "\"{}\" [{} {}]",
        chart.song_name(),
        chart.difficulty_type.label(),
        chart.level
    )
}

pub fn chart_list(prefix: &str, charts: &[Chart]) -> Result<String, std::fmt::Error> {
    let mut output = String::new();

    writeln!(output, "{prefix}:")?;
    for chart in charts {
        writeln!(output, "\t{}: {},", chart.id, chart_line(chart))?;
    }

    Ok(output)
}

pub fn chart(chart: &Chart) -> Result<String, std::fmt::Error> {
    let mut output = String::new();

    writeln!(output, "Chart {}: {}", chart.id, chart_line(chart))?;
    if !chart.chart_view_link.is_empty() {
        writeln!(output, "\tView: {}", chart.chart_view_link)?;
    }
    if let Some(song) = &chart.song {
        writeln!(output, "\tSong {} ({}):", song.id, song.kana)?;
        song_details(&mut output, song, "\t\t")?;
    }

    Ok(output)
}

pub fn my_lists(lists: &[MyList]) -> Result<String, std::fmt::Error> {
    let mut output = String::new();

    writeln!(output, "My Lists:")?;
    for list in lists {
        writeln!(
            output,
            "\t{}. \"{}\" (id: {}),",
            list.position, list.name, list.id
        )?;
    }

    Ok(output)
}

fn entry_line(entry: &MyListChart) -> Result<String, std::fmt::Error> {
    let chart = entry
        .chart
        .as_ref()
        .map_or_else(|| format!("chart {}", entry.chart_id()), chart_line);
    let mut line = format!("{chart} {}", entry.clear_type.label());
    if !entry.memo.is_empty() {
        write!(line, " \"{}\"", entry.memo)?;
    }
    Ok(line)
}

pub fn my_list(
    my_list_id: sekai_types::Id,
    list: Option<&MyList>,
    entries: &[MyListChart],
) -> Result<String, std::fmt::Error> {
    let mut output = String::new();

    match list {
        Some(list) => writeln!(output, "My List {}: \"{}\"", list.id, list.name)?,
        None => writeln!(output, "My List {my_list_id}")?,
    }
    for entry in entries {
        writeln!(output, "\t{}: {},", entry.id, entry_line(entry)?)?;
    }

    Ok(output)
}

pub fn entry(
    entry: &MyListChart,
    attachments: &[MyListChartAttachment],
) -> Result<String, std::fmt::Error> {
    let mut output = String::new();

    writeln!(output, "Entry {}: {}", entry.id, entry_line(entry)?)?;
    writeln!(output, "\tAttachments: [")?;
    for attachment in attachments {
        writeln!(
            output,
            "\t\t{}: [{}] \"{}\" {}: {},",
            attachment.id,
            attachment.attachment_type.label(),
            attachment.caption,
            attachment_view(attachment.attachment_type.code()).as_str(),
            attachment.file_url
        )?;
    }
    writeln!(output, "\t]")?;

    Ok(output)
}

pub fn user(user: &User) -> Result<String, std::fmt::Error> {
    let mut output = String::new();

    writeln!(output, "User {}:", user.id)?;
    writeln!(output, "\tEmail: {}", user.email)?;
    if let Some(created_at) = user.created_at {
        writeln!(output, "\tSince: {}", created_at.format("%Y-%m-%d"))?;
    }

    Ok(output)
}

pub fn route(route: &Route) -> Result<String, std::fmt::Error> {
    let mut output = String::new();

    writeln!(output, "Route: {route:?}")?;
    writeln!(output, "\tPath: {route}")?;
    writeln!(output, "\tRequires Session: {}", route.requires_session())?;
    writeln!(output, "\tRequires Admin: {}", route.requires_admin())?;

    Ok(output)
}
