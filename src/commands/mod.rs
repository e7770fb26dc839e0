// Copyright (c) AlphaVelocity.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

pub mod accounts;
pub mod budgets;
pub mod config;
pub mod documents;
pub mod exporter;
pub mod journal;
pub mod post;
pub mod reports;
