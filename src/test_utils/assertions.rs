use crate::harness::Summary;

pub(crate) fn output_text(out: &[u8]) -> String {
    String::from_utf8(out.to_vec()).expect("output should be UTF-8")
}

pub(crate) fn assert_output_contains(out: &[u8], expected: &[&str]) {
    let text = output_text(out);
    for needle in expected {
        assert!(
            text.contains(needle),
            "expected output to contain {needle:?}, got:\n{text}"
        );
    }
}

pub(crate) fn assert_summary(summary: &Summary, total: usize, successful: usize, failed: usize) {
    assert_eq!(summary.total, total);
    assert_eq!(summary.successful, successful);
    assert_eq!(summary.failed, failed);
}
