// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Test harness for the document visit notifier.
//!
//! Provides a local webhook receiver and generators for scanner traffic.

#![allow(dead_code)]

pub mod generators;
pub mod receiver;
