//! Fixed five-region screen layout
//!
//! The terminal is split into a top bar, a status bar, and a middle band of
//! left navigation, main content and right sidebar. Dimensions are always
//! recomputed as a whole from the terminal size.

use crate::consts::tui_consts::layout::{
    LEFT_NAV_WIDTH, RIGHT_SIDEBAR_WIDTH, STATUS_BAR_HEIGHT, TOP_BAR_HEIGHT, WIDE_SIDEBAR_WIDTH,
    WIDE_TERMINAL_THRESHOLD,
};
use ratatui::layout::Rect;

/// The five screen regions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Region {
    TopBar,
    LeftNav,
    MainContent,
    RightSidebar,
    StatusBar,
}

impl Region {
    pub const ALL: [Region; 5] = [
        Region::TopBar,
        Region::LeftNav,
        Region::MainContent,
        Region::RightSidebar,
        Region::StatusBar,
    ];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayoutDimensions {
    pub term_width: u16,
    pub term_height: u16,
    pub top_height: u16,
    pub status_height: u16,
    pub left_width: u16,
    pub right_width: u16,
    pub main_x: u16,
    pub main_y: u16,
    pub main_width: u16,
    pub main_height: u16,
}

/// Computes region geometry for a `term_width` x `term_height` terminal.
///
/// Terminals below the minimum size get zero-sized main content rather than
/// overlapping regions.
pub fn compute_layout(term_width: u16, term_height: u16) -> LayoutDimensions {
    let (left_width, right_width) = if term_width > WIDE_TERMINAL_THRESHOLD {
        (WIDE_SIDEBAR_WIDTH, WIDE_SIDEBAR_WIDTH)
    } else {
        (LEFT_NAV_WIDTH, RIGHT_SIDEBAR_WIDTH)
    };

    LayoutDimensions {
        term_width,
        term_height,
        top_height: TOP_BAR_HEIGHT,
        status_height: STATUS_BAR_HEIGHT,
        left_width,
        right_width,
        main_x: left_width,
        main_y: TOP_BAR_HEIGHT,
        main_width: term_width.saturating_sub(left_width + right_width),
        main_height: term_height.saturating_sub(TOP_BAR_HEIGHT + STATUS_BAR_HEIGHT),
    }
}

impl LayoutDimensions {
    /// Whether the terminal is large enough for the regions to tile it exactly.
    pub fn fits(&self) -> bool {
        self.term_width >= self.left_width + self.right_width
            && self.term_height >= self.top_height + self.status_height
    }

    pub fn region(&self, region: Region) -> Rect {
        match region {
            Region::TopBar => Rect::new(0, 0, self.term_width, self.top_height),
            Region::LeftNav => Rect::new(0, self.main_y, self.left_width, self.main_height),
            Region::MainContent => {
                Rect::new(self.main_x, self.main_y, self.main_width, self.main_height)
            }
            Region::RightSidebar => Rect::new(
                self.main_x + self.main_width,
                self.main_y,
                self.right_width,
                self.main_height,
            ),
            Region::StatusBar => Rect::new(
                0,
                self.term_height.saturating_sub(self.status_height),
                self.term_width,
                self.status_height,
            ),
        }
    }
}

/// Drawing surfaces for every region, rebuilt together from one set of dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Surfaces {
    pub top_bar: Rect,
    pub left_nav: Rect,
    pub main: Rect,
    pub right_sidebar: Rect,
    pub status_bar: Rect,
}

impl Surfaces {
    pub fn from_layout(layout: &LayoutDimensions) -> Self {
        Self {
            top_bar: layout.region(Region::TopBar),
            left_nav: layout.region(Region::LeftNav),
            main: layout.region(Region::MainContent),
            right_sidebar: layout.region(Region::RightSidebar),
            status_bar: layout.region(Region::StatusBar),
        }
    }

    /// Clips every surface to `area` so undersized terminals never draw out of bounds.
    pub fn clipped_to(&self, area: Rect) -> Self {
        Self {
            top_bar: self.top_bar.intersection(area),
            left_nav: self.left_nav.intersection(area),
            main: self.main.intersection(area),
            right_sidebar: self.right_sidebar.intersection(area),
            status_bar: self.status_bar.intersection(area),
        }
    }
}
