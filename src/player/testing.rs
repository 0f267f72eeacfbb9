// Copyright (C) 2026  Caprica Software Limited
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.

//! Recording audio backend for tests.

use std::{cell::RefCell, collections::HashSet, rc::Rc};

use crate::player::{AudioBackend, AudioHandle, PlayerError};

/// Everything done to one fake handle.
#[derive(Debug, Default)]
pub(crate) struct HandleLog {
    pub(crate) url: String,
    pub(crate) generation: u64,
    pub(crate) volume: Option<f64>,
    pub(crate) seek: Option<f64>,
    pub(crate) playing: bool,
    pub(crate) disposed: usize,
}

struct FakeHandle(Rc<RefCell<HandleLog>>);

impl AudioHandle for FakeHandle {
    fn play(&mut self) -> Result<(), PlayerError> {
        self.0.borrow_mut().playing = true;
        Ok(())
    }

    fn pause(&mut self) -> Result<(), PlayerError> {
        self.0.borrow_mut().playing = false;
        Ok(())
    }

    fn seek(&mut self, fraction: f64) -> Result<(), PlayerError> {
        self.0.borrow_mut().seek = Some(fraction);
        Ok(())
    }

    fn set_volume(&mut self, volume: f64) -> Result<(), PlayerError> {
        self.0.borrow_mut().volume = Some(volume);
        Ok(())
    }

    fn dispose(&mut self) {
        let mut log = self.0.borrow_mut();
        log.playing = false;
        log.disposed += 1;
    }
}

/// Backend that records every handle it hands out.
///
/// Clones share their records, keep one clone to inspect a backend that has
/// been moved into a controller.
#[derive(Clone, Default)]
pub(crate) struct FakeBackend {
    pub(crate) handles: Rc<RefCell<Vec<Rc<RefCell<HandleLog>>>>>,
    pub(crate) broken_urls: Rc<RefCell<HashSet<String>>>,
}

impl FakeBackend {
    pub(crate) fn opened(&self) -> usize {
        self.handles.borrow().len()
    }

    pub(crate) fn handle(&self, n: usize) -> Rc<RefCell<HandleLog>> {
        Rc::clone(&self.handles.borrow()[n])
    }

    pub(crate) fn last(&self) -> Rc<RefCell<HandleLog>> {
        self.handle(self.opened() - 1)
    }
}

impl AudioBackend for FakeBackend {
    fn open(&self, url: &str, generation: u64) -> Result<Box<dyn AudioHandle>, PlayerError> {
        if self.broken_urls.borrow().contains(url) {
            return Err(PlayerError::ResourceLoad {
                url: url.to_string(),
                reason: "decode failure".to_string(),
            });
        }

        let log = Rc::new(RefCell::new(HandleLog {
            url: url.to_string(),
            generation,
            ..HandleLog::default()
        }));
        self.handles.borrow_mut().push(Rc::clone(&log));

        Ok(Box::new(FakeHandle(log)))
    }
}
