mod common;

use actix_web::http::{header, StatusCode};
use actix_web::{test, web, App};
use engagement_letter_server::api;
use engagement_letter_server::api::bulk::{FAILED_HEADER, GENERATED_HEADER};
use serde_json::Value;

use common::*;

#[cfg(test)]
mod bulk_api_tests {
    use super::*;

    macro_rules! app {
        ($state:expr) => {
            test::init_service(
                App::new()
                    .app_data($state.clone())
                    .service(web::scope("/api").configure(api::config)),
            )
            .await
        };
    }

    fn upload(uri: &str, filename: &str, content: &[u8]) -> test::TestRequest {
        test::TestRequest::post()
            .uri(uri)
            .insert_header((header::CONTENT_TYPE, multipart_content_type()))
            .set_payload(multipart_body("file", filename, content))
    }

    fn header_count<B>(resp: &actix_web::dev::ServiceResponse<B>, name: &str) -> usize {
        resp.headers()
            .get(name)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse().ok())
            .expect("count header")
    }

    async fn generate(csv: &str) -> (Vec<u8>, usize, usize) {
        let app = app!(app_state());
        let resp = test::call_service(&app, upload("/api/bulk", "clients.csv", csv.as_bytes()).to_request()).await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(
            resp.headers().get(header::CONTENT_TYPE).unwrap(),
            "application/zip"
        );
        let generated = header_count(&resp, GENERATED_HEADER);
        let failed = header_count(&resp, FAILED_HEADER);
        let bytes = test::read_body(resp).await;
        (bytes.to_vec(), generated, failed)
    }

    #[actix_web::test]
    async fn test_archive_has_one_entry_per_row() {
        for rows in [0, 1, 50] {
            let (archive, generated, failed) = generate(&clients_csv(rows)).await;
            let names = zip_entry_names(&archive);
            assert_eq!(names.len(), rows, "rows = {}", rows);
            assert_eq!(generated, rows);
            assert_eq!(failed, 0);
            assert!(names
                .iter()
                .all(|n| n.starts_with("Tax_Audit_Engagement_Letter_Client ") && n.ends_with(".docx")));
        }
    }

    #[actix_web::test]
    async fn test_entries_are_letters_for_their_rows() {
        let (archive, _, _) = generate(&clients_csv(2)).await;
        let docx = {
            let mut zip = zip::ZipArchive::new(std::io::Cursor::new(archive.as_slice())).unwrap();
            let mut entry = zip
                .by_name("Tax_Audit_Engagement_Letter_Client 2.docx")
                .unwrap();
            let mut bytes = Vec::new();
            std::io::Read::read_to_end(&mut entry, &mut bytes).unwrap();
            bytes
        };
        let xml = docx_document_xml(&docx);
        assert!(xml.contains("Client 2"));
        assert!(xml.contains("Street 2"));
        assert!(xml.contains("50,000"));
    }

    #[actix_web::test]
    async fn test_unknown_type_falls_back_to_statutory() {
        let csv = "client_name,assignment_type\nGamma Ltd,Forensic Audit\nDelta Ltd,\n";
        let (archive, generated, failed) = generate(csv).await;
        let mut names = zip_entry_names(&archive);
        names.sort();

        assert_eq!((generated, failed), (2, 0));
        assert_eq!(
            names,
            vec![
                "Statutory_Audit_Engagement_Letter_Delta Ltd.docx",
                "Statutory_Audit_Engagement_Letter_Gamma Ltd.docx",
            ]
        );
    }

    #[actix_web::test]
    async fn test_failed_rows_are_listed_not_fatal() {
        let csv = "client_name,client_address\nGood One,Pune\n,Mumbai\nGood Two,Delhi\n";
        let (archive, generated, failed) = generate(csv).await;

        assert_eq!((generated, failed), (2, 1));
        let names = zip_entry_names(&archive);
        assert_eq!(names.len(), 3);
        assert!(names.contains(&"errors.txt".to_string()));
        assert_eq!(
            zip_entry_text(&archive, "errors.txt"),
            "row 2: client_name is empty\n"
        );
    }

    #[actix_web::test]
    async fn test_duplicate_clients_get_distinct_entries() {
        let csv = "client_name\nSame Co\nSame Co\n";
        let (archive, generated, _) = generate(csv).await;
        let mut names = zip_entry_names(&archive);
        names.sort();

        assert_eq!(generated, 2);
        assert_eq!(
            names,
            vec![
                "Statutory_Audit_Engagement_Letter_Same Co.docx",
                "Statutory_Audit_Engagement_Letter_Same Co_2.docx",
            ]
        );
    }

    #[actix_web::test]
    async fn test_xlsx_upload_generates_letters() {
        let app = app!(app_state());
        let resp = test::call_service(
            &app,
            upload("/api/bulk", "clients.xlsx", &clients_xlsx()).to_request(),
        )
        .await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(header_count(&resp, GENERATED_HEADER), 2);
        assert_eq!(header_count(&resp, FAILED_HEADER), 0);

        let archive = test::read_body(resp).await;
        let mut names = zip_entry_names(&archive);
        names.sort();
        assert_eq!(
            names,
            vec![
                "GST_Audit_Engagement_Letter_Acme Pvt Ltd.docx",
                "Tax_Audit_Engagement_Letter_Beta LLP.docx",
            ]
        );

        let docx = {
            let mut zip = zip::ZipArchive::new(std::io::Cursor::new(archive.as_ref())).unwrap();
            let mut entry = zip
                .by_name("GST_Audit_Engagement_Letter_Acme Pvt Ltd.docx")
                .unwrap();
            let mut bytes = Vec::new();
            std::io::Read::read_to_end(&mut entry, &mut bytes).unwrap();
            bytes
        };
        let xml = docx_document_xml(&docx);
        assert!(xml.contains("01-04-2024"));
        assert!(xml.contains("50000"));
    }

    #[actix_web::test]
    async fn test_preview_shows_first_rows() {
        let app = app!(app_state());
        let csv = clients_csv(8);
        let req = upload("/api/bulk/preview", "clients.csv", csv.as_bytes()).to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;

        assert_eq!(body["total_rows"], 8);
        let rows = body["rows"].as_array().unwrap();
        assert_eq!(rows.len(), 5);
        assert_eq!(rows[0]["client_name"], "Client 1");
        assert_eq!(rows[0]["assignment_type"], "Tax Audit");
        assert_eq!(rows[0]["fees"], "50,000");
    }

    #[actix_web::test]
    async fn test_unsupported_upload_rejected() {
        let app = app!(app_state());
        let resp = test::call_service(&app, upload("/api/bulk", "clients.txt", b"client_name\nA\n").to_request()).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn test_missing_file_field_rejected() {
        let app = app!(app_state());
        let req = test::TestRequest::post()
            .uri("/api/bulk")
            .insert_header((header::CONTENT_TYPE, multipart_content_type()))
            .set_payload(multipart_body("other", "clients.csv", b"client_name\nA\n"))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }
}
