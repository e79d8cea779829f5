#![allow(dead_code)]

use std::io::{Cursor, Write};

use axum::{body::to_bytes, http::Request, Router};
use flate2::write::GzEncoder;
use flate2::Compression;
use runhelper_rs::{config::Config, routes, state::AppState};
use serde_json::Value;
use tower::ServiceExt;
use zip::write::FileOptions;
use zip::ZipWriter;

pub const BOUNDARY: &str = "X-BOUNDARY-TEST";

pub const CSV_HEADER: &str = "Activity ID,Activity Date,Activity Name,Activity Type,Activity Description,Elapsed Time,Distance,Max Heart Rate,Relative Effort,Commute,Filename,Moving Time,Distance,Elevation Gain,Average Heart Rate";

pub fn app() -> Router {
    routes::app(AppState::new(Config::from_env()))
}

pub async fn send(app: Router, request: Request<axum::body::Body>) -> (axum::http::StatusCode, Value) {
    let response = app.oneshot(request).await.expect("response");
    let status = response.status();
    let body = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body bytes");
    let json = serde_json::from_slice(&body).unwrap_or(Value::Null);
    (status, json)
}

pub fn get(uri: &str) -> Request<axum::body::Body> {
    Request::builder()
        .uri(uri)
        .method("GET")
        .body(axum::body::Body::empty())
        .expect("request")
}

pub fn post_json(uri: &str, body: Value) -> Request<axum::body::Body> {
    Request::builder()
        .uri(uri)
        .method("POST")
        .header("content-type", "application/json")
        .body(axum::body::Body::from(body.to_string()))
        .expect("request")
}

pub enum Part<'a> {
    File {
        filename: &'a str,
        body: &'a [u8],
    },
    Text {
        name: &'a str,
        value: &'a str,
    },
}

pub fn post_multipart(uri: &str, parts: &[Part<'_>]) -> Request<axum::body::Body> {
    let mut body = Vec::new();
    for part in parts {
        body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
        match part {
            Part::File { filename, body: bytes } => {
                body.extend_from_slice(
                    format!(
                        "Content-Disposition: form-data; name=\"files\"; filename=\"{filename}\"\r\nContent-Type: application/octet-stream\r\n\r\n"
                    )
                    .as_bytes(),
                );
                body.extend_from_slice(bytes);
            }
            Part::Text { name, value } => {
                body.extend_from_slice(
                    format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}").as_bytes(),
                );
            }
        }
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());

    Request::builder()
        .uri(uri)
        .method("POST")
        .header(
            "content-type",
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(axum::body::Body::from(body))
        .expect("request")
}

pub fn gzip(bytes: &[u8]) -> Vec<u8> {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(bytes).expect("gzip write");
    encoder.finish().expect("gzip finish")
}

pub fn zip_archive(entries: &[(&str, Vec<u8>)]) -> Vec<u8> {
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    for (name, body) in entries {
        writer
            .start_file(*name, FileOptions::default())
            .expect("start entry");
        writer.write_all(body).expect("write entry");
    }
    writer.finish().expect("finish zip").into_inner()
}

const FIT_CRC_TABLE: [u16; 16] = [
    0x0000, 0xCC01, 0xD801, 0x1400, 0xF001, 0x3C00, 0x2800, 0xE401, 0xA001, 0x6C00, 0x7800,
    0xB401, 0x5000, 0x9C01, 0x8801, 0x4400,
];

fn fit_crc(bytes: &[u8]) -> u16 {
    bytes.iter().fold(0u16, |crc, &byte| {
        let tmp = FIT_CRC_TABLE[(crc & 0xF) as usize];
        let crc = ((crc >> 4) & 0x0FFF) ^ tmp ^ FIT_CRC_TABLE[(byte & 0xF) as usize];
        let tmp = FIT_CRC_TABLE[(crc & 0xF) as usize];
        ((crc >> 4) & 0x0FFF) ^ tmp ^ FIT_CRC_TABLE[((byte >> 4) & 0xF) as usize]
    })
}

/// A minimal FIT stream of `record` messages: (FIT timestamp, lat, long in semicircles).
pub fn fit_file(points: &[(u32, i32, i32)]) -> Vec<u8> {
    let mut records = vec![0x40, 0x00, 0x00];
    records.extend_from_slice(&20u16.to_le_bytes());
    records.push(3);
    records.extend_from_slice(&[253, 4, 0x86, 0, 4, 0x85, 1, 4, 0x85]);
    for &(timestamp, lat, lon) in points {
        records.push(0x00);
        records.extend_from_slice(&timestamp.to_le_bytes());
        records.extend_from_slice(&lat.to_le_bytes());
        records.extend_from_slice(&lon.to_le_bytes());
    }

    let mut file = vec![14, 0x20];
    file.extend_from_slice(&2132u16.to_le_bytes());
    file.extend_from_slice(&(records.len() as u32).to_le_bytes());
    file.extend_from_slice(b".FIT");
    let header_crc = fit_crc(&file);
    file.extend_from_slice(&header_crc.to_le_bytes());
    file.extend_from_slice(&records);
    let crc = fit_crc(&file);
    file.extend_from_slice(&crc.to_le_bytes());
    file
}
