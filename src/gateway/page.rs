//! Chat page served at `/`.

use crate::config::GatewaySettings;

fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn initials(name: &str) -> String {
    name.split_whitespace()
        .filter_map(|w| w.chars().next())
        .take(2)
        .collect::<String>()
        .to_uppercase()
}

/// Render the page for `name` with the sidebar described by `settings`
pub fn render(name: &str, settings: &GatewaySettings) -> String {
    let name_html = escape_html(name);

    let photo = match (&settings.photo, &settings.assets_dir) {
        (Some(photo), Some(_)) => format!(
            r#"<img class="photo" src="/assets/{}" alt="{}">"#,
            escape_html(photo.trim_start_matches('/')),
            name_html
        ),
        _ => format!(r#"<div class="photo initials">{}</div>"#, escape_html(&initials(name))),
    };

    let tagline = settings
        .tagline
        .as_deref()
        .map(|t| format!(r#"<p class="tagline">{}</p>"#, escape_html(t)))
        .unwrap_or_default();

    let links: String = settings
        .links
        .iter()
        .map(|link| {
            format!(
                r#"<li><a href="{}" target="_blank" rel="noopener">{}</a></li>"#,
                escape_html(&link.url),
                escape_html(&link.label)
            )
        })
        .collect();

    PAGE_TEMPLATE
        .replace("{{NAME}}", &name_html)
        .replace("{{PHOTO}}", &photo)
        .replace("{{TAGLINE}}", &tagline)
        .replace("{{LINKS}}", &links)
}

const PAGE_TEMPLATE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="utf-8">
    <meta name="viewport" content="width=device-width, initial-scale=1">
    <title>{{NAME}} - AI Chat</title>
    <style>
        * { box-sizing: border-box; }
        body { font-family: system-ui, sans-serif; margin: 0; display: flex; min-height: 100vh; color: #222; }
        aside { width: 280px; padding: 1.5rem; background: #f4f4f6; border-right: 1px solid #ddd; }
        main { flex: 1; display: flex; flex-direction: column; max-width: 860px; margin: 0 auto; padding: 1rem; }
        h1 { text-align: center; font-size: 1.6rem; }
        .photo { width: 150px; height: 150px; border-radius: 50%; object-fit: cover; display: block; }
        .initials { background: #c9d3e6; display: flex; align-items: center; justify-content: center; font-size: 3rem; color: #fff; }
        .tagline { color: #555; }
        aside ul { padding-left: 1.1rem; }
        aside form { display: flex; flex-direction: column; gap: .5rem; margin-top: 1.5rem; }
        input, textarea { font: inherit; padding: .45rem; border: 1px solid #ccc; border-radius: 4px; }
        button { font: inherit; padding: .5rem .9rem; border: 0; border-radius: 4px; background: #3056d3; color: #fff; cursor: pointer; }
        button:disabled { opacity: .6; cursor: default; }
        #log { flex: 1; overflow-y: auto; padding: .5rem 0; }
        .msg { padding: .6rem .8rem; border-radius: 6px; margin: .4rem 0; white-space: pre-wrap; }
        .user { background: #e8eefc; }
        .assistant { background: #f1f1f1; }
        .error { background: #fde8e8; color: #8a1f1f; }
        #chat { display: flex; gap: .5rem; }
        #chat input { flex: 1; }
        .notice { font-size: .9rem; }
    </style>
</head>
<body>
    <aside>
        {{PHOTO}}
        <h3>{{NAME}}</h3>
        {{TAGLINE}}
        <ul>{{LINKS}}</ul>
        <form id="contact">
            <strong>Contact me</strong>
            <input name="email" type="email" placeholder="Your email">
            <input name="name" placeholder="Your name">
            <textarea name="notes" rows="3" placeholder="Message or notes"></textarea>
            <button type="submit">Send</button>
            <div id="contact-status" class="notice"></div>
        </form>
    </aside>
    <main>
        <h1>Chat with {{NAME}} (AI)</h1>
        <div id="log"></div>
        <form id="chat">
            <input id="input" autocomplete="off" placeholder="Type your question here...">
            <button type="submit">Send</button>
        </form>
    </main>
    <script>
        const turns = [];
        const log = document.getElementById('log');
        const chat = document.getElementById('chat');
        const input = document.getElementById('input');

        function show(role, text) {
            const div = document.createElement('div');
            div.className = 'msg ' + role;
            div.textContent = text;
            log.appendChild(div);
            log.scrollTop = log.scrollHeight;
        }

        chat.addEventListener('submit', async (e) => {
            e.preventDefault();
            const message = input.value.trim();
            if (!message) return;
            input.value = '';
            show('user', message);
            const button = chat.querySelector('button');
            button.disabled = true;
            try {
                const resp = await fetch('/api/chat', {
                    method: 'POST',
                    headers: { 'Content-Type': 'application/json' },
                    body: JSON.stringify({ message, history: turns })
                });
                const body = await resp.json();
                if (!resp.ok) throw new Error(body.error ? body.error.message : resp.statusText);
                show('assistant', body.reply);
                turns.push({ role: 'user', content: message });
                turns.push({ role: 'assistant', content: body.reply });
            } catch (err) {
                show('error', 'Something went wrong: ' + err.message);
            } finally {
                button.disabled = false;
                input.focus();
            }
        });

        const contact = document.getElementById('contact');
        const contactStatus = document.getElementById('contact-status');
        contact.addEventListener('submit', async (e) => {
            e.preventDefault();
            const data = Object.fromEntries(new FormData(contact));
            if (!data.email.trim()) {
                contactStatus.textContent = 'Please enter your email.';
                return;
            }
            try {
                const resp = await fetch('/api/contact', {
                    method: 'POST',
                    headers: { 'Content-Type': 'application/json' },
                    body: JSON.stringify(data)
                });
                const body = await resp.json();
                contactStatus.textContent = resp.ok && body.recorded === 'ok' ? 'Message sent!' : 'Something went wrong.';
                if (resp.ok) contact.reset();
            } catch (err) {
                contactStatus.textContent = 'Something went wrong.';
            }
        });
    </script>
</body>
</html>"#;
