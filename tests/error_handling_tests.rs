#[cfg(test)]
mod error_handling_tests {
    use absensi_server::config::ConfigError;
    use absensi_server::report::ReportError;
    use absensi_server::ErrorResponse;

    #[test]
    fn test_error_response_kinds() {
        assert_eq!(ErrorResponse::bad_request("x").error, "BadRequest");
        assert_eq!(ErrorResponse::not_found("x").error, "NotFound");
        assert_eq!(ErrorResponse::unauthorized("x").error, "Unauthorized");
        assert_eq!(ErrorResponse::forbidden("x").error, "Forbidden");
        assert_eq!(ErrorResponse::internal_error("x").error, "InternalServerError");
    }

    #[test]
    fn test_error_response_serialization() {
        let error_response = ErrorResponse::internal_error("Gagal mengunduh laporan PDF");
        let value = serde_json::to_value(&error_response).unwrap();

        assert_eq!(value["error"], "InternalServerError");
        assert_eq!(value["message"], "Gagal mengunduh laporan PDF");
        let timestamp = value["timestamp"].as_str().unwrap();
        assert!(chrono::DateTime::parse_from_rfc3339(timestamp).is_ok());
    }

    #[test]
    fn test_report_error_messages() {
        let err = ReportError::SchoolNotFound("school-1".to_string());
        assert_eq!(err.to_string(), "school 'school-1' not found");

        let err = ReportError::InvalidRequest("Validasi gagal: 1 kesalahan ditemukan".to_string());
        assert!(err.to_string().contains("Validasi gagal"));
    }

    #[test]
    fn test_config_error_messages() {
        let err = ConfigError::Invalid {
            name: "PORT",
            value: "abc".to_string(),
        };
        assert_eq!(err.to_string(), "PORT has invalid value 'abc'");
        assert_eq!(
            ConfigError::Missing("SUPABASE_DATABASE_URL").to_string(),
            "SUPABASE_DATABASE_URL must be set"
        );
    }

    #[test]
    fn test_malformed_preferences_json() {
        let malformed_json = r#"{ "show_dynamic_dashboard": "yes" "#;
        let result: Result<absensi_server::dashboard::DashboardPreferences, _> = serde_json::from_str(malformed_json);
        assert!(result.is_err());
    }
}
