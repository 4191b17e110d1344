mod common;

use std::sync::Arc;
use std::time::Duration;

use absensi_server::attendance::{AttendanceSummary, DateRange, MonthPeriod};
use absensi_server::report::{
    ReportError, ReportFormat, ReportKind, ReportRequest, ReportScope, ReportService,
};

use common::{date, seeded_store, MockAttendanceStore, SCHOOL_ID};

fn service(store: Arc<MockAttendanceStore>) -> ReportService {
    ReportService::new(store, Duration::from_secs(600))
}

fn request(scope: ReportScope, format: ReportFormat) -> ReportRequest {
    ReportRequest::new(SCHOOL_ID, scope, format, date(2025, 5, 14))
}

fn may() -> Option<String> {
    Some("2025-05".to_string())
}

fn summary(present: u32, sick: u32, permitted: u32, absent: u32) -> AttendanceSummary {
    AttendanceSummary {
        present,
        sick,
        permitted,
        absent,
        total: present + sick + permitted + absent,
    }
}

#[tokio::test]
async fn test_monthly_report_counts_recognized_records_only() {
    let service = service(Arc::new(seeded_store()));
    let data = service
        .build(&request(ReportScope::Monthly { month: may() }, ReportFormat::Pdf))
        .await
        .unwrap();

    assert_eq!(data.kind, ReportKind::Monthly { month: MonthPeriod::new(2025, 5).unwrap() });
    assert_eq!(data.school.name, "SMP Negeri 1 Cakung");
    assert_eq!(data.summary, summary(2, 1, 1, 1));
}

#[tokio::test]
async fn test_monthly_report_defaults_to_current_month() {
    let service = service(Arc::new(seeded_store()));
    let data = service
        .build(&request(ReportScope::Monthly { month: None }, ReportFormat::Pdf))
        .await
        .unwrap();
    assert_eq!(data.kind, ReportKind::Monthly { month: MonthPeriod::new(2025, 5).unwrap() });
}

#[tokio::test]
async fn test_generate_monthly_pdf() {
    let service = service(Arc::new(seeded_store()));
    let report = service
        .generate(&request(ReportScope::Monthly { month: may() }, ReportFormat::Pdf))
        .await
        .unwrap();

    assert_eq!(report.filename, "Laporan_monthly_14-05-2025.pdf");
    assert_eq!(report.content_type, "application/pdf");
    assert_eq!(report.tanggal, "14 Mei 2025");
    assert!(report.bytes.starts_with(b"%PDF"));
}

#[tokio::test]
async fn test_class_report_covers_last_week_of_one_class() {
    let service = service(Arc::new(seeded_store()));
    let scope = ReportScope::Class {
        class_name: "IX-A".to_string(),
        start: None,
        end: None,
    };
    let data = service.build(&request(scope, ReportFormat::Pdf)).await.unwrap();

    assert_eq!(
        data.kind,
        ReportKind::Class {
            class_name: "IX-A".to_string(),
            range: DateRange::new(date(2025, 5, 7), date(2025, 5, 14)),
        }
    );
    assert_eq!(data.summary, summary(2, 1, 0, 1));
    assert_eq!(data.homeroom_teacher.as_deref(), Some("Ibu Rina Wati, S.Pd."));

    let names: Vec<_> = data.students.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, ["Ani Lestari", "Budi Santoso"]);
    assert_eq!(data.students[0].hadir, 2);
    assert_eq!(data.students[1].sakit, 1);
    assert_eq!(data.students[1].alpha, 1);
}

#[tokio::test]
async fn test_class_report_rejects_inverted_range() {
    let service = service(Arc::new(seeded_store()));
    let scope = ReportScope::Class {
        class_name: "IX-A".to_string(),
        start: Some(date(2025, 5, 20)),
        end: Some(date(2025, 5, 1)),
    };
    let err = service.build(&request(scope, ReportFormat::Pdf)).await.unwrap_err();
    assert!(matches!(err, ReportError::InvalidRequest(_)));
}

#[tokio::test]
async fn test_student_report() {
    let service = service(Arc::new(seeded_store()));
    let scope = ReportScope::Student {
        student_id: "stu-3".to_string(),
        month: may(),
    };
    let data = service.build(&request(scope, ReportFormat::Pdf)).await.unwrap();

    assert_eq!(
        data.kind,
        ReportKind::Student {
            month: MonthPeriod::new(2025, 5).unwrap(),
            student_name: "Citra Dewi".to_string(),
            class_name: Some("IX-B".to_string()),
        }
    );
    // "late" is not a recognized status
    assert_eq!(data.summary, summary(0, 0, 1, 0));
    assert_eq!(data.homeroom_teacher, None);
}

#[tokio::test]
async fn test_student_of_another_school_is_not_found() {
    let service = service(Arc::new(seeded_store()));
    let scope = ReportScope::Student {
        student_id: "stu-9".to_string(),
        month: may(),
    };
    let err = service.build(&request(scope, ReportFormat::Pdf)).await.unwrap_err();
    assert!(matches!(err, ReportError::StudentNotFound(id) if id == "stu-9"));
}

#[tokio::test]
async fn test_unknown_school() {
    let service = service(Arc::new(seeded_store()));
    let req = ReportRequest::new(
        "school-404",
        ReportScope::Monthly { month: may() },
        ReportFormat::Pdf,
        date(2025, 5, 14),
    );
    let err = service.build(&req).await.unwrap_err();
    assert!(matches!(err, ReportError::SchoolNotFound(_)));
}

#[tokio::test]
async fn test_comprehensive_report() {
    let service = service(Arc::new(seeded_store()));
    let data = service
        .build(&request(ReportScope::Comprehensive { month: may() }, ReportFormat::Xlsx))
        .await
        .unwrap();

    assert_eq!(data.summary, summary(2, 1, 1, 1));
    assert_eq!(data.students.len(), 3);

    let labels: Vec<_> = data.weekly.iter().map(|w| w.label.as_str()).collect();
    assert_eq!(labels, ["Minggu 1", "Minggu 2", "Minggu 3", "Minggu 4"]);
    // 30 April falls in the week of 27 April
    assert_eq!(data.weekly[1].summary, summary(1, 0, 0, 0));
    assert_eq!(data.weekly[3].summary, summary(2, 1, 1, 1));
}

#[tokio::test]
async fn test_generate_comprehensive_xlsx() {
    let service = service(Arc::new(seeded_store()));
    let report = service
        .generate(&request(ReportScope::Comprehensive { month: may() }, ReportFormat::Xlsx))
        .await
        .unwrap();

    assert_eq!(report.filename, "Laporan_Komprehensif_14-05-2025.xlsx");
    assert!(report.bytes.starts_with(b"PK"));
}

#[tokio::test]
async fn test_monthly_recap_for_one_class() {
    let service = service(Arc::new(seeded_store()));
    let scope = ReportScope::MonthlyRecap {
        month: may(),
        class_name: Some("IX-A".to_string()),
    };
    let data = service.build(&request(scope.clone(), ReportFormat::Pdf)).await.unwrap();

    assert_eq!(data.students.len(), 2);
    assert_eq!(data.summary, summary(2, 1, 0, 1));
    assert_eq!(data.homeroom_teacher.as_deref(), Some("Ibu Rina Wati, S.Pd."));

    let report = service.generate(&request(scope, ReportFormat::Pdf)).await.unwrap();
    assert_eq!(report.filename, "Rekap_Kehadiran_Mei_2025.pdf");
}

#[tokio::test]
async fn test_empty_month_still_renders() {
    let service = service(Arc::new(seeded_store()));
    let scope = ReportScope::Monthly {
        month: Some("2024-01".to_string()),
    };
    let data = service.build(&request(scope.clone(), ReportFormat::Pdf)).await.unwrap();
    assert!(data.summary.is_empty());

    let report = service.generate(&request(scope, ReportFormat::Xlsx)).await.unwrap();
    assert!(report.bytes.starts_with(b"PK"));
}

#[tokio::test]
async fn test_validation_runs_before_any_fetch() {
    let store = Arc::new(seeded_store());
    store.fail();
    let service = service(store);

    let err = service
        .build(&request(
            ReportScope::Monthly {
                month: Some("Mei 2025".to_string()),
            },
            ReportFormat::Pdf,
        ))
        .await
        .unwrap_err();
    match err {
        ReportError::InvalidRequest(message) => assert!(message.contains("YYYY-MM")),
        other => panic!("expected invalid request, got {other:?}"),
    }
}

#[tokio::test]
async fn test_store_failure_is_reported() {
    let store = Arc::new(seeded_store());
    store.fail();
    let service = service(store);

    let err = service
        .build(&request(ReportScope::Monthly { month: may() }, ReportFormat::Pdf))
        .await
        .unwrap_err();
    assert!(matches!(err, ReportError::Store(_)));
}

#[tokio::test]
async fn test_school_info_is_cached() {
    let store = Arc::new(seeded_store());
    let service = service(store.clone());

    let first = service.fetch_school(SCHOOL_ID).await.unwrap();
    store.fail();
    let second = service.fetch_school(SCHOOL_ID).await.unwrap();
    assert_eq!(first, second);
}

#[tokio::test]
async fn test_monthly_recap_roster_ignores_unrecognized_statuses() {
    let service = service(Arc::new(seeded_store()));
    let scope = ReportScope::MonthlyRecap {
        month: may(),
        class_name: None,
    };
    let data = service.build(&request(scope, ReportFormat::Xlsx)).await.unwrap();

    assert_eq!(data.students.len(), 3);
    for row in &data.students {
        assert_eq!(row.hadir + row.sakit + row.izin + row.alpha, row.total());
    }
    // Citra's "late" record is not counted
    let citra = &data.students[2];
    assert_eq!(citra.name, "Citra Dewi");
    assert_eq!((citra.izin, citra.total()), (1, 1));
    assert_eq!(data.summary, summary(2, 1, 1, 1));
}

#[tokio::test]
async fn test_class_report_end_without_room_for_default_start() {
    let service = service(Arc::new(seeded_store()));
    let scope = ReportScope::Class {
        class_name: "IX-A".to_string(),
        start: None,
        end: Some(chrono::NaiveDate::MIN),
    };
    let err = service.build(&request(scope, ReportFormat::Pdf)).await.unwrap_err();
    assert!(matches!(err, ReportError::InvalidRequest(_)));
}
