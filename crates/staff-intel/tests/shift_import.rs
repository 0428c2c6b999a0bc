use std::io::Cursor;

use staff_intel::workflows::roster_import::{ShiftExportImporter, ShiftImportError};
use staff_intel::workflows::staffing::{analyze_hour_balance, Guard, ShiftStatus};

const EXPORT: &str = "Shift ID,Guard ID,Site ID,Date,Start,End,Status,Late\n\
s-100,g-1,site-1,2025-06-01,07:00,15:00,Confirmed,\n\
s-101,g-1,site-1,2025-06-02,07:00,15:00,Published,no\n\
s-102,g-2,site-2,2025-06-02T21:00:00Z,22:00,06:00,active,\n\
s-103,,site-2,2025-06-03,22:00,06:00,published,\n\
s-104,g-2,site-1,2025-05-28,07:00,15:00,No-Show,\n";

#[test]
fn imported_exports_feed_the_hour_balancer() {
    let shifts = ShiftExportImporter::from_reader(Cursor::new(EXPORT)).expect("import succeeds");
    assert_eq!(shifts.len(), 5);
    assert!(shifts[3].guard_id.is_none());
    assert_eq!(shifts[4].status, ShiftStatus::NoShow);

    let guards = vec![Guard::new("g-1", "Jo"), Guard::new("g-2", "Lee")];
    let report = analyze_hour_balance(&guards, &shifts, 40.0);

    assert_eq!(report.guards[0].hours, 16.0);
    assert_eq!(report.guards[1].hours, 8.0);
    assert_eq!(report.total_hours, 24.0);
}

#[test]
fn malformed_dates_name_the_offending_row() {
    let export = "Shift ID,Guard ID,Site ID,Date,Start,End,Status,Late\n\
s-1,g-1,site-1,2025-06-01,07:00,15:00,confirmed,\n\
s-2,g-1,site-1,2025-06-02,07:00,15:00,confirmed,\n\
s-3,g-1,site-1,June 3rd,07:00,15:00,confirmed,\n";

    let error = ShiftExportImporter::from_reader(Cursor::new(export)).expect_err("bad date");
    assert!(matches!(error, ShiftImportError::InvalidRow { row: 3, .. }));
    assert!(error.to_string().contains("row 3"));
}
