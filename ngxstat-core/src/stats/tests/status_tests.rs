use crate::stats::{StatusClasses, StatusHistogram};
use pretty_assertions::assert_eq;

#[test]
fn classes_group_by_hundreds() {
    // Arrange
    let mut h = StatusHistogram::default();

    // Act
    for status in [101, 200, 204, 301, 404, 404, 503, 99, 999] {
        h.record(status);
    }

    // Assert
    assert_eq!(
        h.classes(),
        StatusClasses {
            informational: 1,
            success: 2,
            redirection: 1,
            client_error: 2,
            server_error: 1,
            out_of_range: 2,
        }
    );
    assert_eq!(h.get(404), 2);
    assert_eq!(h.total(), 9);
}

#[test]
fn merge_sums_per_code() {
    let mut a = StatusHistogram::default();
    let mut b = StatusHistogram::default();
    a.record(200);
    b.record(200);
    b.record(500);

    a.merge(&b);

    assert_eq!(a.get(200), 2);
    assert_eq!(a.get(500), 1);
    assert_eq!(a.counts().len(), 2);
}
