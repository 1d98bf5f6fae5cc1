// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: Apache-2.0

//! Test data generators for contact form traffic.

use portfolio_api::ContactSubmission;
use std::net::{IpAddr, Ipv4Addr};

use super::upstream::GOOD_TOKEN;

/// Generate a pool of IP addresses for testing.
pub fn generate_ips(count: usize) -> Vec<IpAddr> {
    (0..count)
        .map(|i| {
            // Use 10.x.x.x private range
            let a = ((i >> 16) & 0xFF) as u8;
            let b = ((i >> 8) & 0xFF) as u8;
            let c = (i & 0xFF) as u8;
            IpAddr::V4(Ipv4Addr::new(10, a, b, c))
        })
        .collect()
}

/// A complete, legitimate submission from `email`.
pub fn legitimate(email: &str) -> ContactSubmission {
    ContactSubmission {
        name: "Ada Lovelace".to_string(),
        email: email.to_string(),
        subject: "Collaboration".to_string(),
        message: "Hi! I enjoyed your portfolio and would like to talk about a project.\nCheers".to_string(),
        captcha_token: GOOD_TOKEN.to_string(),
        ..Default::default()
    }
}

/// Submissions from bots that fill every input, including the hidden one.
pub fn generate_honeypot_bots(count: usize) -> Vec<ContactSubmission> {
    (0..count)
        .map(|i| ContactSubmission {
            honeypot: format!("https://bot-{i}.example.net"),
            ..legitimate(&format!("bot{i}@example.com"))
        })
        .collect()
}

/// Spam messages that pass the honeypot but trip the content heuristic.
pub fn generate_spam(count: usize) -> Vec<ContactSubmission> {
    let bodies = [
        "We offer cheap SEO services for your site".to_string(),
        "Earn PASSIVE INCOME with our crypto platform".to_string(),
        "Click here for a limited time offer".to_string(),
        "Links: https://a.example http://b.example https://c.example".to_string(),
        "You have won the lottery, reply with your bank details".to_string(),
    ];

    (0..count)
        .map(|i| ContactSubmission {
            subject: format!("Opportunity #{i}"),
            message: bodies[i % bodies.len()].clone(),
            ..legitimate(&format!("promo{i}@example.com"))
        })
        .collect()
}

/// Submissions with one required field left blank, cycling through fields.
pub fn generate_incomplete(count: usize) -> Vec<ContactSubmission> {
    (0..count)
        .map(|i| {
            let mut submission = legitimate(&format!("user{i}@example.com"));
            match i % 5 {
                0 => submission.name.clear(),
                1 => submission.email = "   ".to_string(),
                2 => submission.subject.clear(),
                3 => submission.message.clear(),
                _ => submission.captcha_token.clear(),
            }
            submission
        })
        .collect()
}

/// Syntactically broken addresses.
pub fn generate_malformed_emails() -> Vec<&'static str> {
    vec![
        "not-an-email",
        "missing-at.example.com",
        "two@@example.com",
        "user@nodot",
        "spaces in@example.com",
        "@example.com",
        "user@",
    ]
}
