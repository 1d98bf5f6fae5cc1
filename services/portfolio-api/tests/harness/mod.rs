// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: Apache-2.0

//! Test harness for the portfolio API.
//!
//! In-memory stand-ins for the mail relay, DNS and captcha provider, a fake
//! upstream HTTP server, and generators for legitimate and bot traffic.
#![allow(dead_code)]

pub mod fakes;
pub mod generators;
pub mod metrics;
