//! TUI testing utilities using Ratatui's TestBackend

use lookback::App;
use ratatui::{backend::TestBackend, buffer::Buffer, layout::Rect, Terminal};

/// Create a test terminal with custom dimensions
pub fn create_test_terminal_sized(width: u16, height: u16) -> Terminal<TestBackend> {
    let backend = TestBackend::new(width, height);
    Terminal::new(backend).expect("Failed to create test terminal")
}

/// Draw `app` on a fresh 100x40 terminal and return the buffer
pub fn render_app(app: &App) -> Buffer {
    let mut terminal = create_test_terminal_sized(100, 40);
    terminal.draw(|f| app.draw(f)).expect("Failed to draw");
    terminal.backend().buffer().clone()
}

/// Convert a buffer to a string, one line per row
pub fn buffer_to_string(buffer: &Buffer) -> String {
    let area = buffer.area;
    let mut output = String::new();

    for y in area.y..area.y + area.height {
        for x in area.x..area.x + area.width {
            if let Some(cell) = buffer.cell((x, y)) {
                output.push_str(cell.symbol());
            }
        }
        output.push('\n');
    }

    output
}

/// Extract a specific region of the buffer as a string
pub fn buffer_region_to_string(buffer: &Buffer, area: Rect) -> String {
    let mut output = String::new();

    for y in area.y..area.y.saturating_add(area.height) {
        for x in area.x..area.x.saturating_add(area.width) {
            if let Some(cell) = buffer.cell((x, y)) {
                output.push_str(cell.symbol());
            }
        }
        if y < area.y + area.height - 1 {
            output.push('\n');
        }
    }

    output
}

/// Assert that a specific region of the buffer contains expected text
pub fn assert_buffer_contains(buffer: &Buffer, area: Rect, expected: &str) {
    let actual = buffer_region_to_string(buffer, area);

    assert!(
        actual.contains(expected),
        "Buffer region does not contain expected text.\nExpected: {}\nActual:\n{}",
        expected,
        actual
    );
}
