use crate::models::{DashboardResponse, TimePeriod, TrendPoint};

pub fn render_index(dashboard: &DashboardResponse) -> String {
    let goal = &dashboard.monthly_goal;
    let goal_html = if goal.total > 0 {
        let caption = if goal.reached {
            "Goal reached!".to_string()
        } else {
            format!("{:.1} to go", goal.remaining)
        };
        GOAL_HTML
            .replace("{{GOAL_AVERAGE}}", &format!("{:.1}", goal.average))
            .replace("{{GOAL_TARGET}}", &format!("{:.1}", goal.target))
            .replace("{{GOAL_WIDTH}}", &format!("{:.1}", goal.progress_percent))
            .replace("{{GOAL_CAPTION}}", &caption)
    } else {
        String::new()
    };

    let hint_html = if dashboard.read_only_hint {
        r#"<p id="readonly-hint" class="hint">The read-only demo API is in use. Set <code>ENERGY_CREATE_ENTRY_URL</code> to an endpoint that accepts POST requests to save entries.</p>"#
    } else {
        ""
    };

    INDEX_HTML
        .replace("{{STYLE}}", STYLE)
        .replace("{{PERIODS}}", &render_periods(dashboard.period))
        .replace("{{GOAL}}", &goal_html)
        .replace("{{GOOD}}", &dashboard.stats.good.to_string())
        .replace("{{NEUTRAL}}", &dashboard.stats.neutral.to_string())
        .replace("{{BAD}}", &dashboard.stats.bad.to_string())
        .replace("{{AVERAGE}}", &format!("{:.1}", dashboard.stats.average))
        .replace("{{TOTAL}}", &dashboard.stats.total.to_string())
        .replace("{{READONLY_HINT}}", hint_html)
        .replace("{{SCRIPT}}", SCRIPT)
        .replace("{{TRENDS_WEEK}}", &render_trend(&dashboard.trends.by_week))
        .replace("{{TRENDS_MONTH}}", &render_trend(&dashboard.trends.by_month))
        .replace("{{RECENT}}", &render_recent(dashboard))
}

pub fn render_load_error(message: &str) -> String {
    ERROR_HTML
        .replace("{{STYLE}}", STYLE)
        .replace("{{MESSAGE}}", &escape_html(message))
}

fn render_periods(active: TimePeriod) -> String {
    TimePeriod::ALL
        .iter()
        .map(|period| {
            let class = if *period == active { "tab active" } else { "tab" };
            format!(
                r#"<a class="{class}" href="/?period={}">{}</a>"#,
                period.as_str(),
                period.label()
            )
        })
        .collect::<Vec<_>>()
        .join("\n        ")
}

fn render_recent(dashboard: &DashboardResponse) -> String {
    if dashboard.recent.is_empty() {
        return r#"<p class="empty">No entries yet</p>"#.to_string();
    }

    dashboard
        .recent
        .iter()
        .map(|recent| {
            format!(
                r#"<details class="entry {tone}"><summary><span class="score">{score}</span><span class="date">{date}</span><span class="preview">{thoughts}</span></summary><p>{thoughts}</p></details>"#,
                tone = recent.tone.css_class(),
                score = recent.entry.score,
                date = escape_html(&recent.entry.date),
                thoughts = escape_html(&recent.entry.thoughts),
            )
        })
        .collect::<Vec<_>>()
        .join("\n        ")
}

fn render_trend(points: &[TrendPoint]) -> String {
    if points.is_empty() {
        return r#"<li class="empty">No data yet</li>"#.to_string();
    }

    points
        .iter()
        .map(|point| {
            let width = (point.average / 5.0 * 100.0).min(100.0);
            format!(
                r#"<li><span class="label">{}</span><span class="bar"><span style="width: {width:.1}%"></span></span><span class="value">{:.1} · {}</span></li>"#,
                escape_html(&point.label),
                point.average,
                point.total,
            )
        })
        .collect::<Vec<_>>()
        .join("\n          ")
}

fn escape_html(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            // Keeps user text from forming `{{PLACEHOLDER}}` markers.
            '{' => escaped.push_str("&#123;"),
            '}' => escaped.push_str("&#125;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

const GOAL_HTML: &str = r#"<section class="goal">
      <div class="goal-header">
        <span class="label">Monthly goal</span>
        <span class="value">{{GOAL_AVERAGE}} <small>of {{GOAL_TARGET}}</small></span>
      </div>
      <div class="progress"><span style="width: {{GOAL_WIDTH}}%"></span></div>
      <p class="subtitle">{{GOAL_CAPTION}}</p>
    </section>"#;

const STYLE: &str = r#"<style>
    @import url('https://fonts.googleapis.com/css2?family=Space+Grotesk:wght@400;500;600&family=Fraunces:wght@600&display=swap');

    :root {
      --bg-1: #f8f3e6;
      --bg-2: #f5d3a7;
      --ink: #2b2a28;
      --accent: #ff6b4a;
      --accent-2: #2f4858;
      --card: rgba(255, 255, 255, 0.86);
      --shadow: 0 24px 60px rgba(47, 72, 88, 0.18);
      --energy-excellent: #1f9d6b;
      --energy-good: #4cbf8a;
      --energy-neutral: #e7b83a;
      --energy-medium-low: #ef8a43;
      --energy-low: #d9534f;
    }

    * {
      box-sizing: border-box;
    }

    body {
      margin: 0;
      min-height: 100vh;
      background: radial-gradient(circle at top, var(--bg-2), transparent 60%),
        linear-gradient(135deg, var(--bg-1), #ffe9d4 60%, #f9f2e9 100%);
      color: var(--ink);
      font-family: "Space Grotesk", "Trebuchet MS", sans-serif;
      display: grid;
      place-items: center;
      padding: 32px 18px 48px;
    }

    .app {
      width: min(860px, 100%);
      background: var(--card);
      backdrop-filter: blur(12px);
      border-radius: 28px;
      box-shadow: var(--shadow);
      padding: 36px;
      display: grid;
      gap: 28px;
    }

    header {
      display: flex;
      flex-wrap: wrap;
      align-items: center;
      justify-content: space-between;
      gap: 16px;
    }

    h1 {
      font-family: "Fraunces", "Georgia", serif;
      font-weight: 600;
      font-size: clamp(2rem, 4vw, 2.8rem);
      margin: 0;
    }

    h2 {
      margin: 0 0 12px;
      font-size: 1.3rem;
    }

    .subtitle {
      margin: 0;
      color: #5f5c57;
      font-size: 1rem;
    }

    .actions {
      display: flex;
      gap: 10px;
    }

    button {
      appearance: none;
      border: none;
      border-radius: 999px;
      padding: 12px 18px;
      font-size: 1rem;
      font-weight: 600;
      cursor: pointer;
      background: var(--accent);
      color: white;
    }

    button.outline {
      background: white;
      color: var(--accent-2);
      border: 1px solid rgba(47, 72, 88, 0.2);
    }

    button:disabled {
      opacity: 0.5;
      cursor: not-allowed;
    }

    .tabs {
      display: flex;
      justify-content: center;
      gap: 6px;
      padding: 6px;
      background: rgba(47, 72, 88, 0.08);
      border-radius: 999px;
    }

    .tab {
      border-radius: 999px;
      padding: 8px 14px;
      font-size: 0.9rem;
      font-weight: 600;
      color: #6b645d;
      text-decoration: none;
    }

    .tab.active {
      background: white;
      color: var(--accent-2);
      box-shadow: 0 8px 16px rgba(47, 72, 88, 0.12);
    }

    .goal, .stat, .panel {
      background: white;
      border-radius: 18px;
      padding: 18px;
      border: 1px solid rgba(47, 72, 88, 0.08);
    }

    .goal-header {
      display: flex;
      justify-content: space-between;
      align-items: baseline;
    }

    .progress {
      height: 12px;
      margin: 12px 0;
      background: rgba(47, 72, 88, 0.1);
      border-radius: 999px;
      overflow: hidden;
    }

    .progress span {
      display: block;
      height: 100%;
      background: linear-gradient(90deg, var(--energy-good), var(--energy-excellent));
    }

    .stats {
      display: grid;
      grid-template-columns: repeat(auto-fit, minmax(150px, 1fr));
      gap: 16px;
    }

    .stat .label, .goal .label {
      display: block;
      font-size: 0.85rem;
      text-transform: uppercase;
      letter-spacing: 0.12em;
      color: #8b857d;
    }

    .stat .value, .goal .value {
      font-size: 1.7rem;
      font-weight: 600;
      color: var(--accent-2);
    }

    .entry {
      border-left: 4px solid var(--accent-2);
      border-radius: 12px;
      padding: 10px 14px;
      margin-bottom: 10px;
      background: rgba(47, 72, 88, 0.04);
    }

    .entry summary {
      display: flex;
      gap: 12px;
      align-items: center;
      cursor: pointer;
    }

    .entry .score {
      font-weight: 600;
      font-size: 1.3rem;
    }

    .entry .preview {
      color: #6b645d;
      overflow: hidden;
      text-overflow: ellipsis;
      white-space: nowrap;
    }

    .entry.energy-excellent { border-color: var(--energy-excellent); }
    .entry.energy-good { border-color: var(--energy-good); }
    .entry.energy-neutral { border-color: var(--energy-neutral); }
    .entry.energy-medium-low { border-color: var(--energy-medium-low); }
    .entry.energy-low { border-color: var(--energy-low); }

    .trend {
      list-style: none;
      margin: 0;
      padding: 0;
      display: grid;
      gap: 8px;
    }

    .trend li {
      display: grid;
      grid-template-columns: 120px 1fr 80px;
      gap: 10px;
      align-items: center;
    }

    .trend .bar {
      height: 8px;
      background: rgba(47, 72, 88, 0.1);
      border-radius: 999px;
      overflow: hidden;
    }

    .trend .bar span {
      display: block;
      height: 100%;
      background: var(--accent);
    }

    .empty, .hint {
      color: #8b857d;
      text-align: center;
    }

    .hint {
      font-size: 0.85rem;
    }

    dialog {
      border: none;
      border-radius: 24px;
      box-shadow: var(--shadow);
      padding: 28px;
      width: min(460px, 92vw);
    }

    .scores {
      display: grid;
      grid-template-columns: repeat(5, 1fr);
      gap: 8px;
      margin: 12px 0;
    }

    .scores button {
      aspect-ratio: 1;
      border-radius: 14px;
      opacity: 0.7;
    }

    .scores button.selected {
      opacity: 1;
      outline: 4px solid var(--accent-2);
    }

    textarea {
      width: 100%;
      min-height: 120px;
      border-radius: 14px;
      border: 1px solid rgba(47, 72, 88, 0.2);
      padding: 12px;
      font: inherit;
    }

    .status {
      font-size: 0.95rem;
      min-height: 1.2em;
      text-align: center;
      color: #c63b2b;
    }

    .toast {
      position: fixed;
      right: 24px;
      bottom: 24px;
      max-width: 360px;
      padding: 14px 18px;
      border-radius: 16px;
      background: var(--accent-2);
      color: white;
      box-shadow: var(--shadow);
      display: none;
    }

    .toast[data-variant="destructive"] {
      background: #c63b2b;
    }
  </style>"#;

const INDEX_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <title>Energy Tracker</title>
  {{STYLE}}
</head>
<body>
  <main class="app">
    <header>
      <div>
        <h1>Energy Tracker</h1>
        <p class="subtitle">Burnout? Not today.</p>
      </div>
      <div class="actions">
        <button class="outline" id="refresh" type="button">Refresh</button>
        <button id="open-dialog" type="button">Add entry</button>
      </div>
    </header>

    <nav class="tabs">
        {{PERIODS}}
    </nav>

    {{GOAL}}

    <section class="stats">
      <div class="stat"><span class="label">Good days</span><span id="good" class="value">{{GOOD}}</span></div>
      <div class="stat"><span class="label">Neutral</span><span id="neutral" class="value">{{NEUTRAL}}</span></div>
      <div class="stat"><span class="label">Bad days</span><span id="bad" class="value">{{BAD}}</span></div>
      <div class="stat"><span class="label">Average</span><span id="average" class="value">{{AVERAGE}}</span></div>
      <div class="stat"><span class="label">Entries</span><span id="total" class="value">{{TOTAL}}</span></div>
    </section>

    <section class="panel">
      <h2>Recent entries</h2>
        {{RECENT}}
    </section>

    <section class="panel">
      <h2>Trends by week</h2>
      <ul class="trend">
          {{TRENDS_WEEK}}
      </ul>
      <h2>Trends by month</h2>
      <ul class="trend">
          {{TRENDS_MONTH}}
      </ul>
    </section>
  </main>

  <dialog id="entry-dialog">
    <h2>Add entry</h2>
    <p class="subtitle">How was your day?</p>
    <div class="scores">
      <button type="button" data-score="1" style="background: var(--energy-low)">1</button>
      <button type="button" data-score="2" style="background: var(--energy-medium-low)">2</button>
      <button type="button" data-score="3" style="background: var(--energy-neutral)">3</button>
      <button type="button" data-score="4" style="background: var(--energy-good)">4</button>
      <button type="button" data-score="5" style="background: var(--energy-excellent)">5</button>
    </div>
    <textarea id="notes" placeholder="What happened today? Thoughts, feelings?"></textarea>
    <p id="form-error" class="status"></p>
    {{READONLY_HINT}}
    <div class="actions">
      <button class="outline" id="close-dialog" type="button">Cancel</button>
      <button id="save" type="button" disabled>Save entry</button>
    </div>
  </dialog>

  <div id="toast" class="toast"><strong id="toast-title"></strong><div id="toast-description"></div></div>

  {{SCRIPT}}
</body>
</html>
"#;

const SCRIPT: &str = r#"<script>
    const dialog = document.getElementById('entry-dialog');
    const notesEl = document.getElementById('notes');
    const saveBtn = document.getElementById('save');
    const errorEl = document.getElementById('form-error');
    const hintEl = document.getElementById('readonly-hint');
    const toastEl = document.getElementById('toast');
    const state = { score: null, notes: '', pending: false };

    const showToast = (toast) => {
      if (!toast) {
        return;
      }
      document.getElementById('toast-title').textContent = toast.title;
      document.getElementById('toast-description').textContent = toast.description;
      toastEl.dataset.variant = toast.variant;
      toastEl.style.display = 'block';
      setTimeout(() => { toastEl.style.display = 'none'; }, 4000);
    };

    const setError = (message) => {
      errorEl.textContent = message || '';
      if (hintEl) {
        hintEl.style.display = message ? 'none' : 'block';
      }
    };

    const sync = () => {
      document.querySelectorAll('.scores button').forEach((btn) => {
        btn.classList.toggle('selected', Number(btn.dataset.score) === state.score);
      });
      notesEl.value = state.notes;
      saveBtn.disabled = state.pending || state.score === null || state.notes.trim().length < 3;
      saveBtn.textContent = state.pending ? 'Saving...' : 'Save entry';
    };

    document.querySelectorAll('.scores button').forEach((btn) => {
      btn.addEventListener('click', () => {
        state.score = Number(btn.dataset.score);
        setError(null);
        sync();
      });
    });

    notesEl.addEventListener('input', () => {
      state.notes = notesEl.value;
      setError(null);
      sync();
    });

    document.getElementById('open-dialog').addEventListener('click', () => dialog.showModal());
    document.getElementById('close-dialog').addEventListener('click', () => {
      setError(null);
      dialog.close();
    });

    document.getElementById('refresh').addEventListener('click', async () => {
      await fetch('/api/refresh' + window.location.search, { method: 'POST' });
      window.location.reload();
    });

    saveBtn.addEventListener('click', async () => {
      state.pending = true;
      sync();
      try {
        const res = await fetch('/api/entries', {
          method: 'POST',
          headers: { 'Content-Type': 'application/json' },
          body: JSON.stringify({ score: state.score, thoughts: state.notes }),
        });
        const body = await res.json();
        showToast(body.toast);
        state.score = body.dialog.score;
        state.notes = body.dialog.notes;
        setError(body.dialog.error);
        if (res.ok) {
          dialog.close();
          setTimeout(() => window.location.reload(), 800);
        }
      } catch (err) {
        setError('Could not save the entry');
      } finally {
        state.pending = false;
        sync();
      }
    });

    sync();
  </script>"#;

const ERROR_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <title>Energy Tracker</title>
  {{STYLE}}
</head>
<body>
  <main class="app">
    <header>
      <h1>Energy Tracker</h1>
    </header>
    <section class="panel">
      <h2 id="load-error">{{MESSAGE}}</h2>
      <p class="subtitle">Check that the energy API is reachable, then try again.</p>
      <div class="actions">
        <button id="retry" type="button">Retry</button>
      </div>
    </section>
  </main>
  <script>
    document.getElementById('retry').addEventListener('click', async () => {
      await fetch('/api/refresh', { method: 'POST' });
      window.location.reload();
    });
  </script>
</body>
</html>
"#;
