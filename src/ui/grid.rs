/// Image grid layout
///
/// Records are laid out into rows of a fixed column count: full rows first,
/// then one partial trailing row for the remainder. The chunking itself is a
/// pure function over slices so the row math is testable without a renderer.

use iced::widget::{container, image, text, Column, Row, Space};
use iced::{Element, Length};

use crate::state::data::ImageRecord;
use crate::Message;

/// Gap between cells and between rows, in pixels
const GRID_SPACING: f32 = 10.0;

/// Height of a cell whose image bytes have not arrived yet
const PENDING_CELL_HEIGHT: f32 = 160.0;

/// Split `items` into rows of `column_count`
///
/// Every row is exactly `column_count` long except possibly the last, which
/// holds the remainder. An empty slice yields no rows.
pub fn chunk_rows<T>(items: &[T], column_count: usize) -> Vec<&[T]> {
    items.chunks(column_count).collect()
}

/// Build the grid for one page of records
///
/// `thumbs` runs parallel to `records`; a `None` slot renders as a
/// placeholder cell until its download settles.
pub fn image_grid<'a>(
    records: &'a [ImageRecord],
    thumbs: &'a [Option<image::Handle>],
    column_count: usize,
) -> Element<'a, Message> {
    if records.is_empty() {
        return text(r"No images ¯\_(ツ)_/¯").size(24).into();
    }

    let mut rows = Column::new().spacing(GRID_SPACING).width(Length::Fill);

    for (row_index, row_records) in chunk_rows(records, column_count).into_iter().enumerate() {
        let mut cells = Row::new().spacing(GRID_SPACING).width(Length::Fill);

        for cell_index in 0..row_records.len() {
            let index = row_index * column_count + cell_index;
            let thumb = thumbs.get(index).and_then(|slot| slot.as_ref());
            cells = cells.push(grid_cell(thumb));
        }

        // Pad the trailing row so its cells keep the 1/column_count width
        for _ in row_records.len()..column_count {
            cells = cells.push(Space::with_width(Length::FillPortion(1)));
        }

        rows = rows.push(cells);
    }

    rows.into()
}

/// One cell: the image once its bytes have arrived, a placeholder before
fn grid_cell<'a>(thumb: Option<&image::Handle>) -> Element<'a, Message> {
    match thumb {
        Some(handle) => container(image(handle.clone()).width(Length::Fill))
            .width(Length::FillPortion(1))
            .into(),
        None => container(text("…").size(24))
            .center_x(Length::FillPortion(1))
            .center_y(PENDING_CELL_HEIGHT)
            .into(),
    }
}
