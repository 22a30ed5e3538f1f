//! JSONL audit file behaviour

use std::sync::Arc;

use access_gate::{Identity, RequestContext};
use audit_ledger::{ActionType, AuditEvent, AuditRecorder, JsonlSink};

fn read_events(path: &std::path::Path) -> Vec<AuditEvent> {
    std::fs::read_to_string(path)
        .expect("read audit log")
        .lines()
        .map(|line| serde_json::from_str(line).expect("valid audit line"))
        .collect()
}

#[test]
fn test_events_appended_in_order() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("logs").join("audit.jsonl");
    let sink = JsonlSink::open(&path).expect("open sink");
    let recorder = AuditRecorder::new(Arc::new(sink));
    let ctx = RequestContext::identified(Identity::new("ops@example.com", "admin"));

    recorder.log_view_load(&ctx, &["engine_rul"], "Engine Health load", 100);
    recorder.log_chat_turn(&ctx, "genie", None, "top failures?", 5);

    let events = read_events(&path);
    assert_eq!(events.len(), 2);
    assert_eq!(events[0].action_type, ActionType::Query);
    assert_eq!(events[1].action_type, ActionType::Chat);
    assert!(events[0].timestamp <= events[1].timestamp);
}

#[test]
fn test_reopen_appends() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("audit.jsonl");
    let ctx = RequestContext::anonymous();

    for _ in 0..2 {
        let recorder = AuditRecorder::new(Arc::new(JsonlSink::open(&path).expect("open sink")));
        recorder.log_view_load(&ctx, &["heater"], "Heater Health load", 1);
    }

    let events = read_events(&path);
    assert_eq!(events.len(), 2);
    assert!(events.iter().all(|e| e.user_email == "unknown"));
}

#[test]
fn test_unopenable_log_degrades_to_reporting_sink() {
    let dir = tempfile::tempdir().expect("temp dir");
    let blocker = dir.path().join("not-a-dir");
    std::fs::write(&blocker, "").expect("write blocker file");
    let path = blocker.join("audit.jsonl");
    assert!(JsonlSink::open(&path).is_err());

    let recorder = AuditRecorder::open_jsonl(&path);
    let ctx = RequestContext::identified(Identity::new("ops@example.com", "admin"));
    recorder.log_view_load(&ctx, &["engine_rul"], "Engine Health tab load", 100);
    recorder.log_chat_turn(&ctx, "genie", None, "still answered?", 0);

    assert!(!path.exists());
}

#[test]
fn test_unavailable_sink_reports_reason() {
    use audit_ledger::{AuditError, AuditSink, UnavailableSink};

    let sink = UnavailableSink::new("logs/audit.jsonl: permission denied");
    let ctx = RequestContext::anonymous();
    let err = sink
        .append(&AuditEvent::query(&ctx, &["t"], "Overview tab load", 1))
        .unwrap_err();
    assert!(matches!(err, AuditError::Unavailable(ref reason) if reason.contains("permission denied")));
}
