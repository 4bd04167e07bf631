//! All schemas that are exposed from endpoints are defined here
//! along with the conversions from market data

use serde::Serialize;
use utoipa::ToSchema;

use learnloop_market::{
    Gender, LearnerData, LearnerProfile as MarketLearnerProfile, QuestionData, RegistrationData,
    Role, SessionData, SessionStatus, TutorData, TutorProfile as MarketTutorProfile, UserData,
};

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct User {
    id: i64,
    name: String,
    email: String,
    profile_image: String,
    age: i64,
    #[schema(value_type = String)]
    role: Role,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Learner {
    id: i64,
    user_id: i64,
    age: i64,
    interest: String,
    #[schema(value_type = String)]
    gender: Gender,
    goal: String,
}

/// A learner profile merged with the public fields of the owning user
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LearnerProfile {
    id: i64,
    user_id: i64,
    age: i64,
    interest: String,
    #[schema(value_type = String)]
    gender: Gender,
    goal: String,
    name: String,
    email: String,
    profile_image: String,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Tutor {
    id: i64,
    user_id: i64,
    age: i64,
    domain: String,
    professional: String,
    work_experience: String,
}

/// A tutor profile merged with the public fields of the owning user
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TutorProfile {
    id: i64,
    user_id: i64,
    age: i64,
    domain: String,
    professional: String,
    work_experience: String,
    name: String,
    email: String,
    profile_image: String,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    id: i64,
    tutor_id: i64,
    tutor_name: String,
    tutor_email: String,
    title: String,
    description: String,
    date: String,
    time: String,
    #[schema(value_type = String)]
    status: SessionStatus,
    meeting_link: Option<String>,
    learners: Vec<i64>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Meeting {
    link: String,
    #[schema(value_type = String)]
    status: SessionStatus,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Registration {
    id: i64,
    session_id: i64,
    learner_id: i64,
    session_date: String,
    session_time: String,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    id: i64,
    subject: String,
    question: String,
    options: Vec<String>,
    correct_answer: i64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct Message {
    message: String,
}

impl Message {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Helper trait to convert any type into a serialized version
pub trait ToSerialized<T>
where
    T: Serialize,
{
    fn to_serialized(&self) -> T;
}

impl<I, O> ToSerialized<Vec<O>> for Vec<I>
where
    I: ToSerialized<O>,
    O: Serialize,
{
    fn to_serialized(&self) -> Vec<O> {
        self.iter().map(|x| x.to_serialized()).collect()
    }
}

impl ToSerialized<User> for UserData {
    fn to_serialized(&self) -> User {
        User {
            id: self.id,
            name: self.name.clone(),
            email: self.email.clone(),
            profile_image: self.profile_image.clone(),
            age: self.age,
            role: self.role,
        }
    }
}

impl ToSerialized<Learner> for LearnerData {
    fn to_serialized(&self) -> Learner {
        Learner {
            id: self.id,
            user_id: self.user_id,
            age: self.age,
            interest: self.interest.clone(),
            gender: self.gender,
            goal: self.goal.clone(),
        }
    }
}

impl ToSerialized<LearnerProfile> for MarketLearnerProfile {
    fn to_serialized(&self) -> LearnerProfile {
        LearnerProfile {
            id: self.learner.id,
            user_id: self.learner.user_id,
            age: self.learner.age,
            interest: self.learner.interest.clone(),
            gender: self.learner.gender,
            goal: self.learner.goal.clone(),
            name: self.user.name.clone(),
            email: self.user.email.clone(),
            profile_image: self.user.profile_image.clone(),
        }
    }
}

impl ToSerialized<Tutor> for TutorData {
    fn to_serialized(&self) -> Tutor {
        Tutor {
            id: self.id,
            user_id: self.user_id,
            age: self.age,
            domain: self.domain.clone(),
            professional: self.professional.clone(),
            work_experience: self.work_experience.clone(),
        }
    }
}

impl ToSerialized<TutorProfile> for MarketTutorProfile {
    fn to_serialized(&self) -> TutorProfile {
        TutorProfile {
            id: self.tutor.id,
            user_id: self.tutor.user_id,
            age: self.tutor.age,
            domain: self.tutor.domain.clone(),
            professional: self.tutor.professional.clone(),
            work_experience: self.tutor.work_experience.clone(),
            name: self.user.name.clone(),
            email: self.user.email.clone(),
            profile_image: self.user.profile_image.clone(),
        }
    }
}

impl ToSerialized<Session> for SessionData {
    fn to_serialized(&self) -> Session {
        Session {
            id: self.id,
            tutor_id: self.tutor_id,
            tutor_name: self.tutor_name.clone(),
            tutor_email: self.tutor_email.clone(),
            title: self.title.clone(),
            description: self.description.clone(),
            date: self.date.clone(),
            time: self.time.clone(),
            status: self.status,
            meeting_link: self.meeting_link.clone(),
            learners: self.learners.clone(),
        }
    }
}

impl ToSerialized<Meeting> for SessionData {
    fn to_serialized(&self) -> Meeting {
        Meeting {
            link: self.meeting_link.clone().unwrap_or_default(),
            status: self.status,
        }
    }
}

impl ToSerialized<Registration> for RegistrationData {
    fn to_serialized(&self) -> Registration {
        Registration {
            id: self.id,
            session_id: self.session_id,
            learner_id: self.learner_id,
            session_date: self.session_date.clone(),
            session_time: self.session_time.clone(),
        }
    }
}

impl ToSerialized<Question> for QuestionData {
    fn to_serialized(&self) -> Question {
        Question {
            id: self.id,
            subject: self.subject.clone(),
            question: self.question.clone(),
            options: self.options.clone(),
            correct_answer: self.correct_answer,
        }
    }
}
