mod common;

use appmon::config::load_config_str;
use appmon::metrics::{render, Monitoring};
use appmon::models::{
    AdsAlertingMetricsLabelValues, AdsAlertingMetricsLogInfo, AppError, CronJobMetricsLabelValues,
    DownstreamServiceMetricsLabelValues, HttpMetrics,
};
use prometheus::Registry;
use std::time::Duration;

const FULL_CONFIG: &str = r#"
version: "1.0.0"
bind_address: "127.0.0.1:0"
metrics:
  namespace: "svc"
  downstream_service:
    namespace: "svc_out"
    http_requests:
      labels: [name, method, code, api_identifier, status]
    http_requests_latency_millis:
      labels: [name, method, code, api_identifier]
      buckets: { start: 10, factor: 2, count: 5 }
  cron_job:
    job_execution_total:
      labels: [job_name, status]
  app:
    application_errors_counter:
      labels: [error_code]
  alerting:
    alerts:
      labels: [account_id, metric_name, alert_level, alert_type, frequency, severity, entity_type]
"#;

fn monitoring() -> (Monitoring, Registry) {
    let config = load_config_str(FULL_CONFIG).unwrap();
    let registry = Registry::new();
    let monitoring = Monitoring::from_config(&config.metrics, &registry).unwrap();
    (monitoring, registry)
}

#[test]
fn integration_downstream_call_uses_domain_namespace() {
    let (monitoring, registry) = monitoring();
    let lv = DownstreamServiceMetricsLabelValues {
        name: "payments".to_string(),
        http_method: "POST".to_string(),
        api_identifier: "charge".to_string(),
    };

    let _start = monitoring.downstream_service.log_metrics_pre(&lv);
    monitoring.downstream_service.log_metrics_post(
        false,
        &lv,
        &HttpMetrics {
            method: "POST".to_string(),
            url: "https://payments.internal/charge".to_string(),
            code: 503,
            request_body_size_bytes: 120,
            response_body_size_bytes: 0,
            response_time: Duration::from_millis(35),
        },
    );

    let text = render(&registry).unwrap();
    assert!(text.contains(
        r#"svc_out_downstream_service_http_requests{api_identifier="charge",code="",method="POST",name="payments",status="total"} 1"#
    ));
    assert!(text.contains(
        r#"svc_out_downstream_service_http_requests{api_identifier="charge",code="503",method="POST",name="payments",status="failure"} 1"#
    ));
    assert!(text.contains(
        r#"svc_out_downstream_service_http_request_latency_millis_bucket{api_identifier="charge",code="503",method="POST",name="payments",le="40"} 1"#
    ));
}

#[test]
fn integration_cron_job_and_app_errors() {
    let (monitoring, registry) = monitoring();
    let lv = CronJobMetricsLabelValues {
        job_name: "nightly_report".to_string(),
    };

    let start = monitoring.cron_job.log_metrics_pre(&lv);
    let err = AppError::new("ERR_REPORT", "storage unavailable");
    monitoring.cron_job.log_metrics_post(Some(&err), &lv, start);

    monitoring
        .app
        .log_metrics(&[err.code.clone(), "ERR_OTHER".to_string()]);
    monitoring.app.log_metrics(&[err.code.clone()]);
    monitoring.app.decrement_app_error_count("ERR_OTHER");

    let text = render(&registry).unwrap();
    assert!(text.contains(r#"svc_cron_job_execution_count{job_name="nightly_report",status="total"} 1"#));
    assert!(text.contains(r#"svc_cron_job_execution_count{job_name="nightly_report",status="failure"} 1"#));
    assert!(text.contains(r#"svc_application_errors_total{error_code="ERR_REPORT"} 2"#));
    assert!(text.contains(r#"svc_application_errors_total{error_code="ERR_OTHER"} 0"#));
}

#[test]
fn integration_alerts_accumulate_generated_count() {
    let (monitoring, registry) = monitoring();
    let lv = AdsAlertingMetricsLabelValues {
        account_id: "42".to_string(),
        metric_name: "ctr".to_string(),
        alert_level: "campaign".to_string(),
        alert_type: "threshold".to_string(),
        frequency: "hourly".to_string(),
        severity: "high".to_string(),
        entity_type: "campaign".to_string(),
    };

    monitoring.alerting.log_metrics(
        &lv,
        &AdsAlertingMetricsLogInfo {
            number_of_alerts_generated: 3.0,
        },
    );
    monitoring.alerting.log_metrics(
        &lv,
        &AdsAlertingMetricsLogInfo {
            number_of_alerts_generated: 2.0,
        },
    );

    let text = render(&registry).unwrap();
    assert!(text.contains(r#"svc_ads_alerts{account_id="42",alert_level="campaign",alert_type="threshold",entity_type="campaign",frequency="hourly",metric_name="ctr",severity="high"} 5"#));
}

#[test]
fn integration_unconfigured_domains_register_nothing() {
    let (monitoring, registry) = monitoring();
    let before = registry.gather().len();

    let lv = Default::default();
    let start = monitoring.db.log_metrics_pre(&lv);
    monitoring.db.log_metrics_post(None, &lv, start);

    assert_eq!(registry.gather().len(), before);
    assert!(!render(&registry).unwrap().contains("db_operations"));
}
