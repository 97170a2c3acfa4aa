use super::result::DetectionBox;

/// Separator between the main three digits and the unit digit.
pub const LABEL_SEPARATOR: char = '-';

/// Assemble a doorplate label from raw detections.
///
/// Boxes are ordered left-to-right by their left edge. Fewer than three
/// detections cannot form a plate number and yield `None`. Exactly three
/// concatenate directly; four or more become `<3 digits>-<4th digit>` with
/// anything past the fourth dropped.
pub fn label_from_boxes(mut boxes: Vec<DetectionBox>) -> Option<String> {
    if boxes.len() < 3 {
        return None;
    }
    boxes.sort_by(|a, b| a.x1.total_cmp(&b.x1));

    let digits: Vec<String> = boxes.iter().map(|b| digit_for_class(b.class_id)).collect();
    if digits.len() == 3 {
        Some(digits.concat())
    } else {
        Some(format!(
            "{}{}{}",
            digits[..3].concat(),
            LABEL_SEPARATOR,
            digits[3]
        ))
    }
}

/// SVHN class mapping: class 10 is the digit zero, everything else renders
/// as its decimal value.
fn digit_for_class(class_id: u32) -> String {
    if class_id == 10 {
        "0".to_string()
    } else {
        class_id.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn boxes(entries: &[(f32, u32)]) -> Vec<DetectionBox> {
        entries
            .iter()
            .map(|&(x1, class_id)| DetectionBox::at_x(x1, class_id, 0.9))
            .collect()
    }

    #[test]
    fn orders_by_left_edge() {
        let label = label_from_boxes(boxes(&[(10.0, 3), (5.0, 1), (20.0, 2)]));
        assert_eq!(label.as_deref(), Some("132"));
    }

    #[test]
    fn class_ten_is_zero() {
        let label = label_from_boxes(boxes(&[(0.0, 10), (1.0, 10), (2.0, 5)]));
        assert_eq!(label.as_deref(), Some("005"));
    }

    #[test]
    fn fewer_than_three_is_unusable() {
        assert_eq!(label_from_boxes(vec![]), None);
        assert_eq!(label_from_boxes(boxes(&[(0.0, 1), (1.0, 2)])), None);
    }

    #[test]
    fn fourth_digit_splits_off_with_separator() {
        let label = label_from_boxes(boxes(&[(0.0, 7), (1.0, 1), (2.0, 9), (3.0, 10)]));
        assert_eq!(label.as_deref(), Some("719-0"));
    }

    #[test]
    fn trailing_detections_are_dropped() {
        let label = label_from_boxes(boxes(&[
            (0.0, 7),
            (1.0, 1),
            (2.0, 9),
            (3.0, 10),
            (4.0, 4),
            (5.0, 4),
        ]));
        assert_eq!(label.as_deref(), Some("719-0"));
    }
}
