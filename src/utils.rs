/*
 * This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at https://mozilla.org/MPL/2.0/.
 */

/// Maximum depth that can be searched, in plies.
///
/// Also bounds the ply of any node, which sizes the killer table.
pub const MAX_DEPTH: usize = 64;

/// Default depth for searches when none is given.
pub const DEFAULT_DEPTH: usize = 3;
