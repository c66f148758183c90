// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

pub mod apply;
pub mod keygen;
pub mod plan;
pub mod pubkey;
pub mod render;
pub mod show;
