use gifmill_core::AppViewModel;

const BAR_WIDTH: usize = 24;

/// Prints the latest view of the tracked job. Each update appends lines
/// instead of redrawing, so the terminal keeps a history of the run.
pub fn render(view: &AppViewModel, base_url: &str) {
    for line in render_lines(view, base_url) {
        println!("{line}");
    }
}

fn render_lines(view: &AppViewModel, base_url: &str) -> Vec<String> {
    let base = base_url.trim_end_matches('/');
    let mut lines = Vec::new();

    if let Some(notice) = &view.notice {
        lines.push(format!("!! {notice}"));
    }

    if view.progress_visible {
        lines.push(format!(
            "{} {:>3}%  {}",
            progress_bar(view.percent),
            view.percent,
            view.status_line
        ));
    }

    if !view.gallery.is_empty() {
        lines.push(format!("Generated {} GIF(s):", view.gallery.len()));
        for row in &view.gallery {
            lines.push(format!(
                "  {}  preview {}{}  download {}{}",
                row.artifact, base, row.preview_href, base, row.download_href
            ));
        }
    }

    lines
}

fn progress_bar(percent: u8) -> String {
    let filled = usize::from(percent.min(100)) * BAR_WIDTH / 100;
    format!("[{}{}]", "#".repeat(filled), "-".repeat(BAR_WIDTH - filled))
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use gifmill_core::{update, AppState, JobStatus, Msg};

    use super::render_lines;

    const BASE: &str = "http://127.0.0.1:5000";

    fn completed_state(artifacts: Vec<String>) -> AppState {
        let (state, _) = update(
            AppState::new(),
            Msg::SubmitRequested {
                video: PathBuf::from("clip.mp4"),
            },
        );
        let (state, _) = update(
            state,
            Msg::SubmitAccepted {
                job_id: "abc".to_string(),
            },
        );
        let (state, _) = update(
            state,
            Msg::StatusArrived {
                job_id: "abc".to_string(),
                status: JobStatus::Completed { artifacts },
            },
        );
        state
    }

    #[test]
    fn idle_state_renders_nothing() {
        let lines = render_lines(&AppState::new().view(), BASE);
        assert!(lines.is_empty());
    }

    #[test]
    fn polling_state_renders_a_progress_line() {
        let (state, _) = update(
            AppState::new(),
            Msg::HandleRestored {
                job_id: "abc".to_string(),
            },
        );
        let lines = render_lines(&state.view(), BASE);
        assert_eq!(lines.len(), 1);
        assert!(lines[0].contains("0%"));
        assert!(lines[0].contains("Resuming previous task..."));
    }

    #[test]
    fn gallery_rows_join_references_against_the_base_url() {
        let state = completed_state(vec!["a.gif".to_string(), "b.gif".to_string()]);
        let lines = render_lines(&state.view(), BASE);

        assert_eq!(lines[0], "Generated 2 GIF(s):");
        assert!(lines[1].contains("preview http://127.0.0.1:5000/static/uploads/output/a.gif"));
        assert!(lines[1].contains("download http://127.0.0.1:5000/download/a.gif"));
        assert!(lines[2].contains("preview http://127.0.0.1:5000/static/uploads/output/b.gif"));
        assert!(lines[2].contains("download http://127.0.0.1:5000/download/b.gif"));
    }

    #[test]
    fn empty_completion_renders_no_gallery() {
        let state = completed_state(vec![]);
        let lines = render_lines(&state.view(), BASE);
        assert!(lines.is_empty());
    }

    #[test]
    fn trailing_slash_in_base_url_does_not_double_up() {
        let state = completed_state(vec!["a.gif".to_string()]);
        let lines = render_lines(&state.view(), "http://127.0.0.1:5000/");
        assert!(lines[1].contains("http://127.0.0.1:5000/download/a.gif"));
    }
}
