use crate::config::GroupingConfig;
use crate::server::api;

pub struct HttpResponse {
    pub status_code: u16,
    pub status_text: &'static str,
    pub content_type: &'static str,
    pub body: String,
}

impl HttpResponse {
    pub fn to_http_string(&self) -> String {
        format!(
            "HTTP/1.1 {} {}\r\nContent-Type: {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            self.status_code,
            self.status_text,
            self.content_type,
            self.body.len(),
            self.body
        )
    }

    fn ok(content_type: &'static str, body: String) -> Self {
        Self {
            status_code: 200,
            status_text: "OK",
            content_type,
            body,
        }
    }
}

pub fn route_request(
    method: &str,
    path: &str,
    body: &str,
    config: &GroupingConfig,
) -> HttpResponse {
    let path = path.split('?').next().unwrap_or(path);
    match (method, path) {
        ("GET", "/") => HttpResponse::ok("text/html; charset=utf-8", index_html(config)),
        ("GET", "/api/health") => match api::health_payload() {
            Ok(payload) => HttpResponse::ok("application/json", payload),
            Err(err) => error_response(500, "Internal Server Error", &err.to_string()),
        },
        ("GET", "/api/config") => match api::config_payload(config) {
            Ok(payload) => HttpResponse::ok("application/json", payload),
            Err(err) => error_response(500, "Internal Server Error", &err.to_string()),
        },
        ("POST", "/api/groups") => match api::groups_payload(body, config) {
            Ok(payload) => HttpResponse::ok("application/json", payload),
            Err(err) => payload_error_response(err),
        },
        ("POST", "/api/groups/export") => match api::groups_csv_payload(body, config) {
            Ok(payload) => HttpResponse::ok("text/csv; charset=utf-8", payload),
            Err(err) => payload_error_response(err),
        },
        _ => error_response(404, "Not Found", "Route not found"),
    }
}

fn payload_error_response(err: api::GroupPayloadError) -> HttpResponse {
    match err {
        api::GroupPayloadError::Parse(err) => {
            error_response(400, "Bad Request", &format!("Invalid request body: {err}"))
        }
        api::GroupPayloadError::Validation(validation) => {
            validation_error_response(400, "Bad Request", validation)
        }
        err @ (api::GroupPayloadError::Serialize(_) | api::GroupPayloadError::Export(_)) => {
            error_response(500, "Internal Server Error", &err.to_string())
        }
    }
}

fn validation_error_response(
    status_code: u16,
    status_text: &'static str,
    payload: api::ValidationErrorResponse,
) -> HttpResponse {
    let fallback =
        "{\n  \"status\": \"error\",\n  \"message\": \"Validation failed\"\n}".to_string();

    HttpResponse {
        status_code,
        status_text,
        content_type: "application/json",
        body: serde_json::to_string_pretty(&payload).unwrap_or(fallback),
    }
}

fn error_response(status_code: u16, status_text: &'static str, message: &str) -> HttpResponse {
    HttpResponse {
        status_code,
        status_text,
        content_type: "application/json",
        body: format!(
            "{{\n  \"status\": \"error\",\n  \"message\": {}\n}}",
            serde_json::to_string(message).unwrap_or_else(|_| "\"Unknown error\"".to_string())
        ),
    }
}

fn index_html(config: &GroupingConfig) -> String {
    INDEX_TEMPLATE
        .replace("{{LIMIT}}", &config.limit.to_string())
        .replace("{{LEADER_COUNT}}", &config.leader_count.to_string())
}

const INDEX_TEMPLATE: &str = r#"<!doctype html>
<html lang="en">
<head>
  <meta charset="utf-8" />
  <meta name="viewport" content="width=device-width,initial-scale=1" />
  <title>Employee Grouping</title>
  <style>
    body { font-family: Arial, sans-serif; max-width: 900px; margin: 24px auto; padding: 0 12px; }
    .card { border: 1px solid #ddd; border-radius: 8px; padding: 14px; margin: 14px 0; }
    .row { display: flex; gap: 12px; }
    .row > div { flex: 1; }
    label { display:block; margin: 8px 0 4px; font-weight: 600; }
    input, textarea { width: 100%; padding: 8px; box-sizing: border-box; }
    button { margin-top: 12px; padding: 8px 14px; }
    table { border-collapse: collapse; margin: 6px 0 14px; }
    td, th { border: 1px solid #ddd; padding: 4px 10px; text-align: left; }
    .error { color: #b00020; }
  </style>
</head>
<body>
  <h1>Employee Grouping</h1>
  <p>Make groups under a salary limit. Leaders are employees; their salary counts toward the group total.</p>

  <div class="card row">
    <div>
      <label for="limit">Salary limit per group</label>
      <input id="limit" type="number" min="1" step="500" value="{{LIMIT}}" />
    </div>
    <div>
      <label for="leader-count">Number of leaders (groups)</label>
      <input id="leader-count" type="number" min="1" step="1" value="{{LEADER_COUNT}}" />
    </div>
  </div>

  <div class="card">
    <label for="employees">Employees (one "name,salary" per line)</label>
    <textarea id="employees" rows="10"></textarea>
    <label for="leaders">Leaders (one name per line, must be employees)</label>
    <textarea id="leaders" rows="6"></textarea>
    <button id="group-btn">Make groups</button>
    <button id="csv-btn">Download CSV</button>
  </div>

  <div id="output"></div>

  <script>
    const output = document.getElementById('output');

    function readPayload() {
      return {
        employees_text: document.getElementById('employees').value,
        leaders_text: document.getElementById('leaders').value,
        limit: Number(document.getElementById('limit').value),
        leader_count: Number(document.getElementById('leader-count').value),
      };
    }

    function escapeHtml(text) {
      const div = document.createElement('div');
      div.textContent = String(text);
      return div.innerHTML;
    }

    function table(rows) {
      return '<table><tr><th>Name</th><th>Salary</th></tr>' +
        rows.map(r => '<tr><td>' + escapeHtml(r.name) + '</td><td>' + r.salary + '</td></tr>').join('') +
        '</table>';
    }

    function showErrors(payload) {
      const messages = (payload.errors || []).flatMap(e => e.messages);
      if (messages.length === 0 && payload.message) messages.push(payload.message);
      output.innerHTML = messages.map(m => '<p class="error">' + escapeHtml(m) + '</p>').join('');
    }

    async function post(path) {
      return fetch(path, {
        method: 'POST',
        headers: { 'Content-Type': 'application/json' },
        body: JSON.stringify(readPayload()),
      });
    }

    document.getElementById('group-btn').addEventListener('click', async () => {
      const response = await post('/api/groups');
      const payload = await response.json();
      if (!response.ok) { showErrors(payload); return; }
      let html = '<h2>Groups</h2>';
      payload.groups.forEach((g, i) => {
        html += '<h3>Group ' + (i + 1) + ' - Leader: ' + escapeHtml(g.leader) + ' | Total Salary: ' + g.total + '</h3>';
        html += table(g.members);
      });
      if (payload.all_assigned) {
        html += '<p>All employees successfully assigned into groups.</p>';
      } else {
        html += '<h2>Unassigned Employees</h2><p>These employees could not be assigned because all groups exceed LIMIT.</p>';
        html += table(payload.unassigned);
      }
      output.innerHTML = html;
    });

    document.getElementById('csv-btn').addEventListener('click', async () => {
      const response = await post('/api/groups/export');
      if (!response.ok) { showErrors(await response.json()); return; }
      const blob = new Blob([await response.text()], { type: 'text/csv' });
      const link = document.createElement('a');
      link.href = URL.createObjectURL(blob);
      link.download = 'grouping_result.csv';
      link.click();
    });
  </script>
</body>
</html>
"#;
