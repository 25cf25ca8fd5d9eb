// SPDX-License-Identifier: GPL-3.0-only

//! External collaborators: sensor sources, click input, alert sinks

pub mod alerts;
pub mod input;
pub mod sensor;
