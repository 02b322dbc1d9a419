//! Route53 client against a mock endpoint.

#![allow(clippy::expect_used, clippy::unwrap_used, clippy::panic)]

mod common;

use common::route53_config;
use serde_json::json;
use webapis_provider::{ProviderError, RecordSetCursor, Route53Api, Route53Client};
use wiremock::matchers::{header_exists, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const ZONES_PAGE: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<ListHostedZonesResponse xmlns="https://route53.amazonaws.com/doc/2013-04-01/">
  <HostedZones>
    <HostedZone><Id>/hostedzone/Z1</Id><Name>a.com.</Name><CallerReference>r1</CallerReference></HostedZone>
    <HostedZone><Id>/hostedzone/Z2</Id><Name>b.com.</Name><CallerReference>r2</CallerReference></HostedZone>
  </HostedZones>
  <IsTruncated>true</IsTruncated>
  <NextMarker>Z3</NextMarker>
  <MaxItems>2</MaxItems>
</ListHostedZonesResponse>"#;

fn client(server: &MockServer) -> Route53Client {
    Route53Client::builder("AKIDEXAMPLE", "secret")
        .config(route53_config(server))
        .build()
        .unwrap()
}

#[tokio::test]
async fn hosted_zones_are_signed_and_converted() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/2013-04-01/hostedzone"))
        .and(query_param("maxitems", "100"))
        .and(header_exists("authorization"))
        .and(header_exists("x-amz-date"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(ZONES_PAGE, "text/xml"))
        .expect(1)
        .mount(&server)
        .await;

    let page = require_ok!(client(&server).list_hosted_zones(None).await);
    assert_eq!(page["IsTruncated"], json!(true));
    assert_eq!(page["NextMarker"], json!("Z3"));
    let zones = require_some!(page["HostedZones"].as_array());
    assert_eq!(zones.len(), 2);
    assert_eq!(zones[1]["Name"], json!("b.com."));
}

#[tokio::test]
async fn marker_is_forwarded() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/2013-04-01/hostedzone"))
        .and(query_param("marker", "Z3"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(
            "<ListHostedZonesResponse><HostedZones/><IsTruncated>false</IsTruncated></ListHostedZonesResponse>",
            "text/xml",
        ))
        .expect(1)
        .mount(&server)
        .await;

    let page = require_ok!(client(&server).list_hosted_zones(Some("Z3")).await);
    assert_eq!(page["HostedZones"], json!([]));
}

#[tokio::test]
async fn record_set_cursor_becomes_query_parameters() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/2013-04-01/hostedzone/Z1/rrset"))
        .and(query_param("name", "www.a.com."))
        .and(query_param("type", "CNAME"))
        .and(query_param("identifier", "blue"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(
            "<ListResourceRecordSetsResponse><ResourceRecordSets>\
             <ResourceRecordSet><Name>www.a.com.</Name><Type>CNAME</Type><SetIdentifier>blue</SetIdentifier><Weight>10</Weight><TTL>60</TTL>\
             <ResourceRecords><ResourceRecord><Value>lb.a.com.</Value></ResourceRecord></ResourceRecords></ResourceRecordSet>\
             </ResourceRecordSets><IsTruncated>false</IsTruncated></ListResourceRecordSetsResponse>",
            "text/xml",
        ))
        .expect(1)
        .mount(&server)
        .await;

    let cursor = RecordSetCursor {
        name: "www.a.com.".to_string(),
        record_type: Some("CNAME".to_string()),
        identifier: Some("blue".to_string()),
    };
    let page = require_ok!(
        client(&server)
            .list_resource_record_sets("Z1", Some(&cursor))
            .await
    );
    let sets = require_some!(page["ResourceRecordSets"].as_array());
    assert_eq!(sets[0]["Weight"], json!(10));
    assert_eq!(sets[0]["ResourceRecords"], json!([{"Value": "lb.a.com."}]));
}

#[tokio::test]
async fn missing_zone_maps_to_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/2013-04-01/hostedzone/Z9/rrset"))
        .respond_with(ResponseTemplate::new(404).set_body_raw(
            "<ErrorResponse><Error><Type>Sender</Type><Code>NoSuchHostedZone</Code>\
             <Message>No hosted zone found with ID: Z9</Message></Error></ErrorResponse>",
            "text/xml",
        ))
        .mount(&server)
        .await;

    let err = client(&server)
        .list_resource_record_sets("Z9", None)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        ProviderError::ResourceNotFound { ref resource, .. } if resource == "Z9"
    ));
}

#[tokio::test]
async fn bad_signature_maps_to_invalid_credentials() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(403).set_body_raw(
            "<ErrorResponse><Error><Code>SignatureDoesNotMatch</Code><Message>nope</Message></Error></ErrorResponse>",
            "text/xml",
        ))
        .mount(&server)
        .await;

    let err = client(&server).list_hosted_zones(None).await.unwrap_err();
    assert!(matches!(err, ProviderError::InvalidCredentials { .. }));
    assert!(err.is_expected());
}

#[tokio::test]
async fn throttled_listing_is_retried() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/2013-04-01/hostedzone"))
        .respond_with(ResponseTemplate::new(400).set_body_raw(
            "<ErrorResponse><Error><Type>Sender</Type><Code>Throttling</Code>\
             <Message>Rate exceeded</Message></Error></ErrorResponse>",
            "text/xml",
        ))
        .up_to_n_times(1)
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/2013-04-01/hostedzone"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(ZONES_PAGE, "text/xml"))
        .expect(1)
        .mount(&server)
        .await;

    let client = Route53Client::builder("AKIDEXAMPLE", "secret")
        .config(webapis_provider::Route53Config {
            max_retries: 2,
            ..route53_config(&server)
        })
        .build()
        .unwrap();
    let page = require_ok!(client.list_hosted_zones(None).await);
    assert_eq!(page["HostedZones"][0]["Id"], json!("/hostedzone/Z1"));
}
