// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Tree-shaped summaries, printed through the logger.

use std::borrow::Cow;

use log::Level;

const VERTICAL: char = '│';
const UP_AND_RIGHT: char = '└';
const VERTICAL_AND_RIGHT: char = '├';

fn branch_symbol(i_line: usize, num_lines: usize, last_block: bool) -> char {
    match i_line {
        0 if last_block && num_lines == 1 => UP_AND_RIGHT,
        0 => VERTICAL_AND_RIGHT,
        _ => VERTICAL,
    }
}

/// A titled summary of blocks of lines. The first line of each block gets a
/// branch; continuation lines get a trunk.
pub(crate) struct SummaryPrinter {
    title: Cow<'static, str>,
    level: Level,
    blocks: Vec<Vec<Cow<'static, str>>>,
}

impl SummaryPrinter {
    pub(crate) fn new(title: Cow<'static, str>) -> Self {
        Self {
            title,
            level: Level::Info,
            blocks: vec![],
        }
    }

    /// Print at `level` rather than info.
    pub(crate) fn at_level(mut self, level: Level) -> Self {
        self.level = level;
        self
    }

    pub(crate) fn push_line(&mut self, line: Cow<'static, str>) {
        self.blocks.push(vec![line]);
    }

    pub(crate) fn push_block(&mut self, block: Vec<Cow<'static, str>>) {
        if !block.is_empty() {
            self.blocks.push(block);
        }
    }

    pub(crate) fn display(self) {
        let level = self.level;
        log::log!(level, "{}", console::style(self.title).bold());
        let num_blocks = self.blocks.len();
        for (i_block, block) in self.blocks.into_iter().enumerate() {
            let last_block = i_block + 1 == num_blocks;
            let num_lines = block.len();
            for (i_line, line) in block.into_iter().enumerate() {
                let symbol = branch_symbol(i_line, num_lines, last_block);
                log::log!(level, "{symbol} {line}");
            }
        }
        log::log!(level, "");
    }
}
