//! Web UI
//!
//! GET / serves one self-contained page: an input form posting to
//! /process_text_audio, a result panel, and a live visual label fed by
//! the /events SSE stream.

use axum::{
    response::{Html, IntoResponse},
    routing::get,
    Router,
};

use crate::AppState;

/// GET /
pub async fn root_page() -> impl IntoResponse {
    let version = env!("CARGO_PKG_VERSION");
    let git_hash = env!("GIT_HASH");
    let build_timestamp = env!("BUILD_TIMESTAMP");
    let build_profile = env!("BUILD_PROFILE");

    let html = format!(
        r#"
<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>emofuse</title>
    <style>
        * {{
            margin: 0;
            padding: 0;
            box-sizing: border-box;
        }}
        body {{
            font-family: 'Segoe UI', Tahoma, Geneva, Verdana, sans-serif;
            background-color: #1a1a1a;
            color: #e0e0e0;
            line-height: 1.6;
        }}
        header {{
            background-color: #2a2a2a;
            border-bottom: 1px solid #3a3a3a;
            padding: 20px;
            margin-bottom: 30px;
            display: flex;
            justify-content: space-between;
            align-items: center;
        }}
        .build-info {{
            font-size: 12px;
            color: #888;
            font-family: 'Courier New', monospace;
            text-align: right;
        }}
        main {{
            display: grid;
            grid-template-columns: 1fr 1fr;
            gap: 20px;
            padding: 0 20px 20px;
        }}
        section {{
            background-color: #2a2a2a;
            border: 1px solid #3a3a3a;
            border-radius: 8px;
            padding: 20px;
        }}
        label {{
            display: block;
            margin-top: 12px;
            color: #aaa;
        }}
        textarea, input[type=file] {{
            width: 100%;
            margin-top: 4px;
            background-color: #1a1a1a;
            color: #e0e0e0;
            border: 1px solid #3a3a3a;
            padding: 6px;
        }}
        button {{
            margin-top: 16px;
            padding: 8px 20px;
            background-color: #4a90e2;
            color: white;
            border: none;
            border-radius: 4px;
            cursor: pointer;
        }}
        button:disabled {{
            background-color: #555;
        }}
        .final {{
            font-size: 32px;
            font-weight: bold;
            color: #4a90e2;
        }}
        table {{
            width: 100%;
            margin-top: 12px;
            border-collapse: collapse;
        }}
        td {{
            padding: 4px 8px;
            border-bottom: 1px solid #3a3a3a;
        }}
        .error {{
            color: #e25c4a;
        }}
        #live {{
            font-size: 20px;
        }}
    </style>
</head>
<body>
    <header>
        <h1>emofuse</h1>
        <div class="build-info">
            <div>v{version} [{git_hash}]</div>
            <div>{build_timestamp} ({build_profile})</div>
        </div>
    </header>
    <main>
        <section>
            <h2>Input</h2>
            <form id="analyze-form">
                <label for="text_input">Text (any language)</label>
                <textarea id="text_input" name="text_input" rows="4"></textarea>
                <label for="audio_file">Audio clip (wav, flac, mp3, ogg, webm)</label>
                <input type="file" id="audio_file" name="audio_file" accept="audio/*">
                <label for="image_file">Face image</label>
                <input type="file" id="image_file" name="image_file" accept="image/*">
                <button type="submit" id="submit">Analyze</button>
            </form>
            <h2 style="margin-top: 24px;">Live camera</h2>
            <div id="live">-</div>
        </section>
        <section>
            <h2>Result</h2>
            <div class="final" id="final">-</div>
            <table>
                <tr><td>Visual</td><td id="visual">-</td></tr>
                <tr><td>Speech</td><td id="speech">-</td></tr>
                <tr><td>Text</td><td id="text">-</td></tr>
                <tr><td>Translated</td><td id="translated">-</td></tr>
                <tr><td>Language</td><td id="lang">-</td></tr>
            </table>
            <div class="error" id="error"></div>
        </section>
    </main>
    <script>
        const form = document.getElementById('analyze-form');
        const submit = document.getElementById('submit');
        const set = (id, value) => {{ document.getElementById(id).textContent = value; }};

        form.addEventListener('submit', async (event) => {{
            event.preventDefault();
            submit.disabled = true;
            set('error', '');
            try {{
                const response = await fetch('/process_text_audio', {{
                    method: 'POST',
                    body: new FormData(form),
                }});
                const body = await response.json();
                if (!response.ok) {{
                    set('error', body.error ? body.error.message : response.statusText);
                    return;
                }}
                set('final', body.final_emotion);
                set('visual', body.visual_emotion + ' (' + body.visual_source + ')');
                set('speech', body.speech_emotion);
                set('text', body.text_emotion);
                set('translated', body.translated_text);
                set('lang', body.lang_status);
            }} catch (err) {{
                set('error', err.toString());
            }} finally {{
                submit.disabled = false;
            }}
        }});

        fetch('/get_visual_emotion')
            .then((r) => r.json())
            .then((body) => set('live', body.streaming ? body.visual_emotion : 'streaming off'));

        const events = new EventSource('/events');
        events.addEventListener('VisualEmotionChanged', (event) => {{
            set('live', JSON.parse(event.data).new_label);
        }});
    </script>
</body>
</html>
"#
    );

    Html(html)
}

/// Build UI routes
pub fn ui_routes() -> Router<AppState> {
    Router::new().route("/", get(root_page))
}
