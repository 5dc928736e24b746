use std::fmt::Write;

use storyreel_core::{AppViewModel, CurrentRunView, NoticeKind, Tab, VideoRowView};

use super::input::HELP;

const BAR_WIDTH: usize = 40;
const RULE: &str = "------------------------------------------------------------";

/// Renders the whole dashboard as text.
pub fn render(view: &AppViewModel) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "{RULE}");
    let _ = writeln!(out, "  Funny Animated Stories - Automated YouTube System");
    let _ = writeln!(out, "{RULE}");
    let _ = writeln!(out, "{}", tab_bar(view.tab));

    if let Some(notice) = &view.notice {
        let marker = match notice.kind {
            NoticeKind::Info => "(i)",
            NoticeKind::Error => "(!)",
        };
        let _ = writeln!(out, "\n{marker} {}  [x to dismiss]", notice.text);
    }
    out.push('\n');

    match view.tab {
        Tab::Dashboard => render_dashboard(&mut out, view),
        Tab::Videos => render_videos(&mut out, &view.videos),
        Tab::About => render_about(&mut out),
    }

    let _ = writeln!(out, "\n{HELP}");
    out
}

fn tab_bar(active: Tab) -> String {
    [
        (Tab::Dashboard, "1 Dashboard"),
        (Tab::Videos, "2 Videos"),
        (Tab::About, "3 About"),
    ]
    .iter()
    .map(|(tab, label)| {
        if *tab == active {
            format!("[{label}]")
        } else {
            format!(" {label} ")
        }
    })
    .collect::<Vec<_>>()
    .join("  ")
}

fn render_dashboard(out: &mut String, view: &AppViewModel) {
    let stats = view.stats;
    let _ = writeln!(
        out,
        "Total Videos: {:<6} Completed: {:<6} Today: {}",
        stats.total, stats.completed, stats.today
    );
    out.push('\n');

    let _ = writeln!(out, "Quick Actions");
    if view.can_generate {
        let _ = writeln!(out, "  [g] Generate Video Now");
    } else {
        let _ = writeln!(out, "  [g] Generating...");
    }
    let _ = writeln!(out, "  [a] Start Automation (4 videos/day)");

    if let Some(current) = &view.current {
        out.push('\n');
        render_current(out, current);
    }
}

fn render_current(out: &mut String, current: &CurrentRunView) {
    let _ = writeln!(out, "Processing...");
    if let Some(title) = &current.title {
        let _ = writeln!(out, "  {title}");
    }
    let _ = writeln!(out, "  {}", current.status);
    let _ = writeln!(
        out,
        "  {} {:>3}%",
        progress_bar(current.progress, BAR_WIDTH),
        current.progress
    );
}

fn render_videos(out: &mut String, videos: &[VideoRowView]) {
    let _ = writeln!(out, "Generated Videos");
    if videos.is_empty() {
        let _ = writeln!(out, "  No videos yet. Press g to generate one!");
        return;
    }
    for video in videos {
        out.push('\n');
        let _ = writeln!(out, "  {}", video.title);
        if let Some(category) = video.category.as_deref().filter(|c| !c.is_empty()) {
            let _ = writeln!(out, "    [{category}]");
        }
        if let Some(moral) = video.moral.as_deref().filter(|m| !m.is_empty()) {
            let _ = writeln!(out, "    {moral}");
        }
        match &video.youtube_url {
            Some(url) => {
                let _ = writeln!(out, "    {url}");
            }
            None if !video.completed => {
                let _ = writeln!(out, "    (not completed)");
            }
            None => {}
        }
        let _ = writeln!(
            out,
            "    Created: {}",
            video.created_at.format("%Y-%m-%d %H:%M:%S")
        );
    }
}

fn render_about(out: &mut String) {
    let _ = writeln!(out, "About");
    let _ = writeln!(
        out,
        "  Each run asks the backend for a short funny story, then voices it,"
    );
    let _ = writeln!(
        out,
        "  renders an animated video and uploads it to YouTube Shorts."
    );
    let _ = writeln!(
        out,
        "  Automation hands scheduling to the backend, which publishes 4 videos a day."
    );
}

fn progress_bar(percent: u8, width: usize) -> String {
    let filled = usize::from(percent.min(100)) * width / 100;
    format!("[{}{}]", "#".repeat(filled), ".".repeat(width - filled))
}
