// Copyright 2025 benchscope Contributors
// SPDX-License-Identifier: Apache-2.0

pub mod api;
pub mod page;
pub mod system;
