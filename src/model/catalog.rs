//! Entity catalog. Each entry declares the table, its columns (the primary key
//! is implicit), the columns an insert requires, and which roles may read or write.

use crate::auth::{AccessPolicy, Role};
use crate::model::{ColumnDescriptor, Entity, PRIMARY_KEY};

macro_rules! entities {
    ($(
        $ty:ident => $table:literal {
            columns: [$($col:literal),* $(,)?],
            required: [$($req:literal),* $(,)?],
            read: [$($read:ident),* $(,)?],
            write: [$($write:ident),* $(,)?] $(,)?
        }
    )*) => {
        $(
            pub struct $ty;

            impl Entity for $ty {
                fn descriptor() -> &'static ColumnDescriptor {
                    static DESCRIPTOR: ColumnDescriptor = ColumnDescriptor::new(
                        $table,
                        &[PRIMARY_KEY, $($col),*],
                        &[$($req),*],
                        AccessPolicy {
                            read: &[$(Role::$read),*],
                            write: &[$(Role::$write),*],
                        },
                    );
                    &DESCRIPTOR
                }
            }
        )*

        /// Every entity in declaration order.
        pub fn all() -> Vec<&'static ColumnDescriptor> {
            vec![$($ty::descriptor()),*]
        }
    };
}

entities! {
    Student => "students" {
        columns: ["name", "surname", "class_name", "birth_date", "email", "phone", "address"],
        required: ["name", "surname"],
        read: [Admin, Teacher],
        write: [Admin],
    }
    Teacher => "teachers" {
        columns: ["name", "surname", "email", "phone", "subjects"],
        required: ["name", "surname"],
        read: [Admin, Teacher],
        write: [Admin],
    }
    Subject => "subjects" {
        columns: ["name", "grade", "description"],
        required: ["name"],
        read: [Admin, Teacher, Student],
        write: [Admin],
    }
    Classroom => "classrooms" {
        columns: ["grade", "name", "building"],
        required: ["grade", "name"],
        read: [Admin, Teacher, Student],
        write: [Admin],
    }
    Timetable => "timetables" {
        columns: ["classroom_id", "subject_id", "teacher_id", "weekday", "start_time", "end_time"],
        required: ["classroom_id", "subject_id", "teacher_id", "weekday", "start_time"],
        read: [Admin, Teacher, Student],
        write: [Admin],
    }
    Notification => "notifications" {
        columns: ["title", "body", "audience", "published_at"],
        required: ["title", "body"],
        read: [Admin, Teacher, Student],
        write: [Admin, Teacher],
    }
    ReliefRecord => "relief_records" {
        columns: ["teacher_id", "substitute_id", "timetable_id", "date", "reason"],
        required: ["teacher_id", "substitute_id", "date"],
        read: [Admin, Teacher],
        write: [Admin, Teacher],
    }
}
